use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use events::{
    ChannelEvent, ClientEvent, ControlEvent, Incoming, decode_incoming, encode_client_event, pong_message,
    requires_auth, socket_url, subscribe_message,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

type ChannelStream = tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("channel message decode failed: {0}")]
    Decode(#[from] events::ProtocolError),
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
    #[error("server returned HTTP {status} for {path}: {message}")]
    ServerError { status: u16, path: String, message: String },
    #[error("subscription to {channel} refused (status {status:?})")]
    SubscriptionRefused { channel: String, status: Option<u16> },
    #[error("channel error {code:?}: {message}")]
    Channel { message: String, code: Option<u16> },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("stdin read failed: {0}")]
    Stdin(#[from] std::io::Error),
}

impl From<tokio_tungstenite::tungstenite::Error> for CliError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WsConnect(Box::new(error))
    }
}

#[derive(Parser, Debug)]
#[command(name = "strangers-cli", about = "Terminal client for the strangers chat channel")]
struct Cli {
    #[arg(long, env = "STRANGERS_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the host server is up.
    Ping,
    /// Print the channel configuration served to browsers.
    Config,
    /// Subscribe and print every inbound channel event.
    Listen(ChannelArgs),
    /// Text chat with a stranger. `/next` skips, `/quit` exits.
    Chat(ChannelArgs),
}

#[derive(Args, Debug)]
struct ChannelArgs {
    #[arg(long, env = "STRANGERS_CHANNEL", help = "Override the configured channel name")]
    channel: Option<String>,

    #[arg(long, default_value_t = 10, help = "Seconds to wait for the subscription")]
    subscribe_timeout: u64,
}

/// Channel settings as served by `GET /api/channel/config`.
#[derive(Debug, Clone, Deserialize)]
struct ChannelConfig {
    ws_url: String,
    app_key: String,
    channel: String,
    auth_endpoint: String,
}

/// One line typed by the user in chat mode.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChatInput {
    Empty,
    Next,
    Quit,
    Message(String),
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let base_url = cli.base_url.trim_end_matches('/').to_owned();

    match cli.command {
        Command::Ping => run_ping(&base_url).await,
        Command::Config => {
            let json = get_json(&base_url, "/api/channel/config").await?;
            print_json(&json)
        }
        Command::Listen(args) => run_listen(&base_url, args).await,
        Command::Chat(args) => run_chat(&base_url, args).await,
    }
}

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let response = reqwest::get(format!("{base_url}/healthz")).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError {
            status: status.as_u16(),
            path: "/healthz".to_owned(),
            message: "health check failed".to_owned(),
        });
    }
    println!("ok");
    Ok(())
}

async fn run_listen(base_url: &str, args: ChannelArgs) -> Result<(), CliError> {
    let (mut stream, channel) = join_channel(base_url, &args).await?;
    eprintln!("subscribed to {channel}; press ctrl-c to stop");

    loop {
        let text = recv_text(&mut stream).await?;
        match decode_incoming(&text) {
            Ok(Incoming::Control(ControlEvent::Ping)) => stream.send(Message::text(pong_message())).await?,
            Ok(Incoming::Control(control)) => check_control(&control)?,
            Ok(Incoming::Channel { event, .. }) => println!("{}", describe_event(&event)),
            Ok(Incoming::Ignored(name)) => println!("(ignored {name})"),
            Err(e) => eprintln!("warning: {e}"),
        }
    }
}

async fn run_chat(base_url: &str, args: ChannelArgs) -> Result<(), CliError> {
    let (mut stream, channel) = join_channel(base_url, &args).await?;
    println!("Looking for someone you can chat with...");

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut connected = false;

    loop {
        tokio::select! {
            line = stdin.next_line() => {
                let Some(line) = line? else {
                    return close(stream).await;
                };
                let event = match parse_chat_input(&line) {
                    ChatInput::Empty => continue,
                    ChatInput::Quit => return close(stream).await,
                    ChatInput::Next => {
                        connected = false;
                        println!("Looking for someone you can chat with...");
                        ClientEvent::Next
                    }
                    ChatInput::Message(_) if !connected => {
                        eprintln!("(not connected to a stranger yet)");
                        continue;
                    }
                    ChatInput::Message(text) => ClientEvent::Message(text),
                };
                stream.send(Message::text(encode_client_event(&channel, &event))).await?;
            }
            text = recv_text(&mut stream) => {
                match decode_incoming(&text?) {
                    Ok(Incoming::Control(ControlEvent::Ping)) => {
                        stream.send(Message::text(pong_message())).await?;
                    }
                    Ok(Incoming::Control(control)) => check_control(&control)?,
                    Ok(Incoming::Channel { event, .. }) => {
                        connected = match &event {
                            ChannelEvent::Matched => true,
                            ChannelEvent::Disconnect | ChannelEvent::Banned { .. } => false,
                            _ => connected,
                        };
                        if let Some(line) = chat_line(&event) {
                            println!("{line}");
                        }
                    }
                    Ok(Incoming::Ignored(_)) => {}
                    Err(e) => eprintln!("warning: {e}"),
                }
            }
        }
    }
}

/// Connect, authorize if needed and subscribe. Returns the live stream and the
/// channel name.
async fn join_channel(base_url: &str, args: &ChannelArgs) -> Result<(ChannelStream, String), CliError> {
    let config: ChannelConfig = serde_json::from_value(get_json(base_url, "/api/channel/config").await?)?;
    let channel = args.channel.clone().unwrap_or(config.channel);

    let (mut stream, _) = connect_async(socket_url(&config.ws_url, &config.app_key)).await?;
    let wait = Duration::from_secs(args.subscribe_timeout);

    let socket_id = tokio::time::timeout(wait, wait_for_socket_id(&mut stream))
        .await
        .map_err(|_| CliError::Timeout("connection_established"))??;

    let auth = if requires_auth(&channel) {
        Some(authorize(base_url, &config.auth_endpoint, &socket_id, &channel).await?)
    } else {
        None
    };
    stream.send(Message::text(subscribe_message(&channel, auth.as_deref()))).await?;

    tokio::time::timeout(wait, wait_for_subscription(&mut stream, &channel))
        .await
        .map_err(|_| CliError::Timeout("subscription_succeeded"))??;
    Ok((stream, channel))
}

async fn wait_for_socket_id(stream: &mut ChannelStream) -> Result<String, CliError> {
    loop {
        if let Incoming::Control(control) = decode_incoming(&recv_text(stream).await?)? {
            check_control(&control)?;
            if let ControlEvent::ConnectionEstablished { socket_id, .. } = control {
                return Ok(socket_id);
            }
        }
    }
}

async fn wait_for_subscription(stream: &mut ChannelStream, channel: &str) -> Result<(), CliError> {
    loop {
        match decode_incoming(&recv_text(stream).await?)? {
            Incoming::Control(ControlEvent::SubscriptionSucceeded { channel: name }) if name == channel => {
                return Ok(());
            }
            Incoming::Control(ControlEvent::SubscriptionError { channel, status }) => {
                return Err(CliError::SubscriptionRefused { channel, status });
            }
            Incoming::Control(ControlEvent::Ping) => stream.send(Message::text(pong_message())).await?,
            Incoming::Control(control) => check_control(&control)?,
            _ => {}
        }
    }
}

async fn authorize(base_url: &str, endpoint: &str, socket_id: &str, channel: &str) -> Result<String, CliError> {
    let url = absolute_url(base_url, endpoint);
    let response = reqwest::Client::new()
        .post(&url)
        .json(&serde_json::json!({ "socket_id": socket_id, "channel_name": channel }))
        .send()
        .await?;
    let value = read_json(endpoint, response).await?;
    value
        .get("auth")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| CliError::ServerError {
            status: 200,
            path: endpoint.to_owned(),
            message: "response has no auth field".to_owned(),
        })
}

async fn get_json(base_url: &str, path: &str) -> Result<Value, CliError> {
    let response = reqwest::get(absolute_url(base_url, path)).await?;
    read_json(path, response).await
}

async fn read_json(path: &str, response: reqwest::Response) -> Result<Value, CliError> {
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or(Value::Null);
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), path: path.to_owned(), message: value.to_string() });
    }
    Ok(value)
}

async fn recv_text(stream: &mut ChannelStream) -> Result<String, CliError> {
    loop {
        let Some(message) = stream.next().await else {
            return Err(CliError::WsClosed);
        };
        match message? {
            Message::Text(text) => return Ok(text.as_str().to_owned()),
            Message::Close(_) => return Err(CliError::WsClosed),
            _ => {}
        }
    }
}

async fn close(mut stream: ChannelStream) -> Result<(), CliError> {
    let _ = stream.close(None).await;
    Ok(())
}

/// Fatal channel errors end the command; everything else is reported.
fn check_control(control: &ControlEvent) -> Result<(), CliError> {
    if let ControlEvent::Error { message, code } = control {
        if control.is_fatal() {
            return Err(CliError::Channel { message: message.clone(), code: *code });
        }
        eprintln!("warning: channel error {code:?}: {message}");
    }
    Ok(())
}

fn absolute_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn parse_chat_input(line: &str) -> ChatInput {
    match line.trim() {
        "" => ChatInput::Empty,
        "/next" => ChatInput::Next,
        "/quit" => ChatInput::Quit,
        text => ChatInput::Message(text.to_owned()),
    }
}

/// What chat mode prints for an inbound event. WebRTC signaling is skipped.
fn chat_line(event: &ChannelEvent) -> Option<String> {
    match event {
        ChannelEvent::Matched => Some("You're now chatting with a random stranger.".to_owned()),
        ChannelEvent::Message(text) => Some(format!("Stranger: {text}")),
        ChannelEvent::Disconnect => Some("Stranger has disconnected. Type /next to find someone new.".to_owned()),
        ChannelEvent::Banned { seconds } => Some(format!("You have been banned for {seconds} seconds.")),
        ChannelEvent::Offer(_) | ChannelEvent::Answer(_) | ChannelEvent::Ice(_) => None,
    }
}

/// One-line summary for `listen`.
fn describe_event(event: &ChannelEvent) -> String {
    match event {
        ChannelEvent::Message(text) => format!("{} {text:?}", event.name()),
        ChannelEvent::Banned { seconds } => format!("{} {seconds}s", event.name()),
        ChannelEvent::Offer(desc) | ChannelEvent::Answer(desc) => {
            format!("{} ({} bytes sdp)", event.name(), desc.sdp.len())
        }
        ChannelEvent::Ice(candidate) => format!("{} {}", event.name(), candidate.candidate),
        ChannelEvent::Matched | ChannelEvent::Disconnect => event.name().to_owned(),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
