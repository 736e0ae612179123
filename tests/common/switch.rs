//! Scripted FreeSWITCH event-socket backend.
//!
//! Listens on a loopback port, speaks the real wire protocol (auth challenge,
//! header blocks, Content-Length framed bodies) and answers each api command
//! with a scripted literal. Failure modes are scripted too: rejected auth,
//! dropped connections, broken framing, stalls.

// Each test binary uses its own subset of the harness.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// A realistic `api status` response body.
pub const STATUS_FIXTURE: &str = "\
UP 0 years, 0 days, 0 hours, 48 minutes, 33 seconds, 239 milliseconds, 353 microseconds
FreeSWITCH (Version 1.10.9 -release- 64bit) is ready
1806 session(s) since startup
12 session(s) - peak 42, last 5min 17
3 session(s) per Sec out of max 30, peak 9, last 5min 5
1000 session(s) max
min idle cpu 0.00/97.23
Current Stack Size/Max 240K/8M
";

/// How command replies frame their bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentLengthMode {
    /// Correct framing: the exact body length.
    Exact,
    /// Omit the Content-Length field entirely.
    Omit,
    /// A Content-Length that is not a number.
    Garbage,
    /// Announce more bytes than the body has, then close.
    Short,
}

/// What the mock switch answers.
#[derive(Debug, Clone)]
pub struct SwitchScript {
    pub password: String,
    /// Reply text for a correct password. Set to something other than
    /// "+OK accepted" to reject every handshake with that text.
    pub auth_reply: String,
    pub calls_body: String,
    pub uptime_body: String,
    pub strepoch_body: String,
    pub status_body: String,
    /// Close the connection after serving this many command replies.
    pub drop_after: Option<usize>,
    pub content_length: ContentLengthMode,
    /// Read commands but never answer them.
    pub stall: bool,
}

impl Default for SwitchScript {
    fn default() -> Self {
        Self {
            password: "ClueCon".to_string(),
            auth_reply: "+OK accepted".to_string(),
            calls_body: r#"{"row_count": 7}"#.to_string(),
            uptime_body: "12345\n".to_string(),
            strepoch_body: "12345".to_string(),
            status_body: STATUS_FIXTURE.to_string(),
            drop_after: None,
            content_length: ContentLengthMode::Exact,
            stall: false,
        }
    }
}

/// One observable protocol event, tagged with its session number (1-based,
/// in accept order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchEvent {
    Opened(usize),
    Command(usize, String),
    Closed(usize),
}

/// A running mock switch.
pub struct MockSwitch {
    addr: SocketAddr,
    script: Arc<Mutex<SwitchScript>>,
    events: Arc<Mutex<Vec<SwitchEvent>>>,
}

impl MockSwitch {
    /// Bind a loopback listener and start accepting sessions.
    pub async fn start(script: SwitchScript) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let script = Arc::new(Mutex::new(script));
        let events = Arc::new(Mutex::new(Vec::new()));

        let script_handle = Arc::clone(&script);
        let events_handle = Arc::clone(&events);
        tokio::spawn(async move {
            let mut session = 0usize;
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                session += 1;
                let script = script_handle.lock().unwrap().clone();
                let events = Arc::clone(&events_handle);
                tokio::spawn(async move {
                    events.lock().unwrap().push(SwitchEvent::Opened(session));
                    let _ = serve(stream, script, session, &events).await;
                    events.lock().unwrap().push(SwitchEvent::Closed(session));
                });
            }
        });

        Ok(Self {
            addr,
            script,
            events,
        })
    }

    pub fn uri(&self) -> String {
        format!("tcp://{}", self.addr)
    }

    pub fn endpoint(&self) -> esl_proto::Endpoint {
        self.uri().parse().expect("listener address is a valid URI")
    }

    /// Swap the script; applies to sessions accepted from now on.
    pub fn set_script(&self, script: SwitchScript) {
        *self.script.lock().unwrap() = script;
    }

    pub fn events(&self) -> Vec<SwitchEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Commands received, with their session numbers, in arrival order.
    pub fn commands(&self) -> Vec<(usize, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SwitchEvent::Command(session, command) => Some((session, command)),
                _ => None,
            })
            .collect()
    }

    /// Number of sessions accepted so far.
    pub fn sessions(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, SwitchEvent::Opened(_)))
            .count()
    }
}

async fn serve(
    stream: TcpStream,
    script: SwitchScript,
    session: usize,
    events: &Mutex<Vec<SwitchEvent>>,
) -> anyhow::Result<()> {
    let (read, mut write) = stream.into_split();
    let mut reader = BufReader::new(read);

    write.write_all(b"Content-Type: auth/request\n\n").await?;

    let auth = read_command(&mut reader).await?;
    events
        .lock()
        .unwrap()
        .push(SwitchEvent::Command(session, auth.clone()));

    let reply = if script.auth_reply != "+OK accepted" {
        script.auth_reply.clone()
    } else if auth == format!("auth {}", script.password) {
        "+OK accepted".to_string()
    } else {
        "-ERR invalid".to_string()
    };
    write
        .write_all(format!("Content-Type: command/reply\nReply-Text: {reply}\n\n").as_bytes())
        .await?;
    if reply != "+OK accepted" {
        return Ok(());
    }

    let mut served = 0usize;
    loop {
        let command = match read_command(&mut reader).await {
            Ok(command) => command,
            // Peer closed; session over.
            Err(_) => return Ok(()),
        };
        events
            .lock()
            .unwrap()
            .push(SwitchEvent::Command(session, command.clone()));

        if script.stall {
            tokio::time::sleep(Duration::from_secs(60)).await;
            return Ok(());
        }
        if let Some(limit) = script.drop_after {
            if served >= limit {
                return Ok(());
            }
        }

        let body = match command.as_str() {
            "api show calls count as json" => &script.calls_body,
            "api uptime s" => &script.uptime_body,
            "api strepoch" => &script.strepoch_body,
            "api status" => &script.status_body,
            _ => anyhow::bail!("unscripted command: {command}"),
        };

        match script.content_length {
            ContentLengthMode::Exact => {
                write
                    .write_all(
                        format!(
                            "Content-Type: api/response\nContent-Length: {}\n\n{}",
                            body.len(),
                            body
                        )
                        .as_bytes(),
                    )
                    .await?;
            }
            ContentLengthMode::Omit => {
                write
                    .write_all(b"Content-Type: api/response\n\n")
                    .await?;
            }
            ContentLengthMode::Garbage => {
                write
                    .write_all(b"Content-Type: api/response\nContent-Length: banana\n\n")
                    .await?;
            }
            ContentLengthMode::Short => {
                write
                    .write_all(
                        format!(
                            "Content-Type: api/response\nContent-Length: {}\n\n{}",
                            body.len() + 64,
                            body
                        )
                        .as_bytes(),
                    )
                    .await?;
                return Ok(());
            }
        }
        served += 1;
    }
}

/// Read one `command\n\n` exchange from the peer.
async fn read_command<R>(reader: &mut R) -> anyhow::Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        anyhow::bail!("peer closed");
    }
    let command = line.trim_end_matches('\n').to_string();

    let mut blank = String::new();
    if reader.read_line(&mut blank).await? == 0 {
        anyhow::bail!("peer closed");
    }
    anyhow::ensure!(blank == "\n", "command not terminated by a blank line");

    Ok(command)
}
