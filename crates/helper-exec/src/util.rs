use std::ffi::OsStr;

use helper_observe::LogSink;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
};
use tracing::warn;

pub fn cmd_program<I, S>(program: &str, args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd
}

/// Which sink method receives the forwarded lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Log,
    Error,
}

/// Copies every line of `reader` into `sink` until EOF.
///
/// Bytes that are not UTF-8 are replaced, never dropped: the pipe is drained to the end so the
/// child does not die on a closed pipe.
pub async fn forward_lines<R>(reader: Option<R>, sink: &dyn LogSink, channel: Channel)
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return;
    };
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "stopped reading host output");
                break;
            }
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\r', '\n']);
        match channel {
            Channel::Log => sink.log(line),
            Channel::Error => sink.error(line),
        }
    }
}
