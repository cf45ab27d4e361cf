//! Line-oriented JSON protocol.
//!
//! Each stdin line is either a `PlayerCommand` (`{"type":"PlaceTower",...}`)
//! or a host request (`{"type":"Snapshot"}`, `{"type":"Quit"}`). Each stdout
//! line wraps one loop output as `{"kind":"event"|"snapshot","data":...}`.

use std::io::{self, BufRead, Write};
use std::sync::mpsc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use skyguard_core::commands::PlayerCommand;
use skyguard_core::events::GameEvent;
use skyguard_core::state::SessionSnapshot;

use crate::state::{LoopCommand, LoopOutput};

#[derive(Debug, Error)]
pub enum IpcError {
    #[error("empty line")]
    Empty,
    #[error("unrecognised message: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Requests handled by the host rather than the engine.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum HostRequest {
    Snapshot,
    Quit,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Command(PlayerCommand),
    Snapshot,
    Quit,
}

impl From<Inbound> for LoopCommand {
    fn from(inbound: Inbound) -> Self {
        match inbound {
            Inbound::Command(cmd) => LoopCommand::Player(cmd),
            Inbound::Snapshot => LoopCommand::EmitSnapshot,
            Inbound::Quit => LoopCommand::Shutdown,
        }
    }
}

pub fn parse_line(line: &str) -> Result<Inbound, IpcError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(IpcError::Empty);
    }
    if let Ok(request) = serde_json::from_str::<HostRequest>(line) {
        return Ok(match request {
            HostRequest::Snapshot => Inbound::Snapshot,
            HostRequest::Quit => Inbound::Quit,
        });
    }
    Ok(Inbound::Command(serde_json::from_str(line)?))
}

#[derive(Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
enum Outbound<'a> {
    Event(&'a GameEvent),
    Snapshot(&'a SessionSnapshot),
}

pub fn encode_output(output: &LoopOutput) -> Result<String, serde_json::Error> {
    match output {
        LoopOutput::Event(event) => serde_json::to_string(&Outbound::Event(event)),
        LoopOutput::Snapshot(snapshot) => serde_json::to_string(&Outbound::Snapshot(snapshot)),
    }
}

/// Forward parsed lines to the game loop until EOF, `Quit`, or the loop
/// going away. Malformed lines are logged and skipped.
pub fn read_commands<R: BufRead>(reader: R, cmd_tx: &mpsc::Sender<LoopCommand>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("reading input failed: {e}");
                break;
            }
        };
        let inbound = match parse_line(&line) {
            Ok(inbound) => inbound,
            Err(IpcError::Empty) => continue,
            Err(e) => {
                warn!("ignoring input line: {e}");
                continue;
            }
        };
        let quit = inbound == Inbound::Quit;
        if cmd_tx.send(inbound.into()).is_err() || quit {
            break;
        }
    }
    debug!("input closed");
}

/// Write every loop output as one JSON line until the loop hangs up.
pub fn write_outputs<W: Write>(output_rx: mpsc::Receiver<LoopOutput>, mut writer: W) -> io::Result<()> {
    for output in output_rx {
        match encode_output(&output) {
            Ok(line) => writeln!(writer, "{line}")?,
            Err(e) => warn!("encoding output failed: {e}"),
        }
        writer.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use skyguard_core::components::TowerId;
    use skyguard_core::enums::TargetingMode;

    #[test]
    fn test_parse_player_commands() {
        assert_eq!(
            parse_line(r#"{"type":"PlaceTower","x":300.0,"y":200.0}"#).unwrap(),
            Inbound::Command(PlayerCommand::PlaceTower { x: 300.0, y: 200.0 })
        );
        assert_eq!(
            parse_line(r#"{"type":"SetTargeting","tower_id":3,"mode":"last"}"#).unwrap(),
            Inbound::Command(PlayerCommand::SetTargeting {
                tower_id: TowerId(3),
                mode: TargetingMode::Last,
            })
        );
    }

    #[test]
    fn test_parse_host_requests() {
        assert_eq!(parse_line(r#"{"type":"Snapshot"}"#).unwrap(), Inbound::Snapshot);
        assert_eq!(parse_line(r#" {"type":"Quit"} "#).unwrap(), Inbound::Quit);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_line("   "), Err(IpcError::Empty)));
        assert!(matches!(parse_line("launch"), Err(IpcError::Parse(_))));
        assert!(matches!(
            parse_line(r#"{"type":"SelfDestruct"}"#),
            Err(IpcError::Parse(_))
        ));
    }

    #[test]
    fn test_encode_event_line() {
        let line = encode_output(&LoopOutput::Event(GameEvent::TowerSold {
            tower_id: TowerId(1),
            refund: 420,
        }))
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["kind"], "event");
        assert_eq!(value["data"]["type"], "TowerSold");
        assert_eq!(value["data"]["refund"], 420);
    }

    #[test]
    fn test_read_commands_stops_at_quit() {
        let input = Cursor::new(
            "{\"type\":\"StartDefense\"}\n\nnot json\n{\"type\":\"Snapshot\"}\n{\"type\":\"Quit\"}\n{\"type\":\"NextWave\"}\n",
        );
        let (tx, rx) = mpsc::channel();
        read_commands(input, &tx);
        drop(tx);

        let received: Vec<LoopCommand> = rx.into_iter().collect();
        assert_eq!(received.len(), 3);
        assert!(matches!(
            received[0],
            LoopCommand::Player(PlayerCommand::StartDefense)
        ));
        assert!(matches!(received[1], LoopCommand::EmitSnapshot));
        assert!(matches!(received[2], LoopCommand::Shutdown));
    }

    #[test]
    fn test_write_outputs_one_line_each() {
        let (tx, rx) = mpsc::channel();
        tx.send(LoopOutput::Event(GameEvent::AutoPauseNotice)).unwrap();
        tx.send(LoopOutput::Snapshot(Box::default())).unwrap();
        drop(tx);

        let mut buf = Vec::new();
        write_outputs(rx, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"kind\":\"event\""));
        assert!(lines[1].contains("\"kind\":\"snapshot\""));
    }
}
