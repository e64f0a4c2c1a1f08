//! Line-oriented service loop binding the wire protocol to a masking session.
//!
//! The loop reads one JSON request per line and writes exactly one JSON
//! response per request. Request-level failures are reported in-band as
//! error responses and never stop the loop or touch the session; only a
//! transport failure ends the run.

use std::io::{BufRead, Write};
use std::path::Path;

use crate::engine::MaskingEngine;
use crate::error::Result;
use crate::protocol::{Request, Response};

/// Apply one decoded request to the session and produce its response.
pub fn handle(engine: &mut MaskingEngine, request: Request) -> Response {
    let outcome = match request {
        Request::AddColor { color, tolerance } => engine.add_color(color, tolerance),
        Request::UpdateTolerance { tolerance, index } => {
            engine.update_tolerance(tolerance, index)
        }
        Request::ProcessImage { path, colors } => {
            engine.process_image(Path::new(&path), colors)
        }
        Request::ClearColors => engine.clear_colors(),
        Request::UpdateEdgeSettings {
            enabled,
            sensitivity,
        } => engine.update_edge_settings(enabled, sensitivity),
    };

    match outcome {
        Ok(Some(path)) => Response::image_processed(path),
        Ok(None) => Response::success(),
        Err(e) => Response::error(e.to_string()),
    }
}

/// Process one raw request line into a response.
///
/// Lines that fail to decode (invalid JSON, unknown command, missing or
/// mistyped fields) yield an error response without reaching the session.
#[must_use]
pub fn handle_line(engine: &mut MaskingEngine, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => handle(engine, request),
        Err(e) => Response::error(format!("invalid request: {e}")),
    }
}

/// Run the service loop until the input channel closes.
///
/// The output channel is flushed after every response so the host sees each
/// acknowledgement promptly.
///
/// # Errors
///
/// Returns an error only when the transport itself fails (reading `input`,
/// or encoding/writing to `output`).
pub fn run<R: BufRead, W: Write>(
    engine: &mut MaskingEngine,
    input: R,
    mut output: W,
) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let response = handle_line(engine, &line);
        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_json_yields_an_error_response() {
        let mut engine = MaskingEngine::new();
        let response = handle_line(&mut engine, "not json at all");
        assert!(matches!(response, Response::Error { .. }));
    }

    #[test]
    fn unknown_command_yields_an_error_response() {
        let mut engine = MaskingEngine::new();
        let response = handle_line(&mut engine, r#"{"command":"make-coffee"}"#);
        assert!(matches!(response, Response::Error { .. }));
        assert!(engine.rules().is_empty());
    }

    #[test]
    fn add_color_without_an_image_acknowledges_plainly() {
        let mut engine = MaskingEngine::new();
        let response = handle_line(
            &mut engine,
            r#"{"command":"add-color","color":[255,0,0],"tolerance":10}"#,
        );
        assert_eq!(response, Response::success());
        assert_eq!(engine.rules().len(), 1);
    }

    #[test]
    fn out_of_range_index_update_still_succeeds() {
        let mut engine = MaskingEngine::new();
        handle_line(&mut engine, r#"{"command":"add-color","color":[1,2,3]}"#);
        handle_line(&mut engine, r#"{"command":"add-color","color":[4,5,6]}"#);

        let response = handle_line(
            &mut engine,
            r#"{"command":"update-tolerance","tolerance":9,"index":5}"#,
        );

        assert_eq!(response, Response::success());
        assert!(engine.rules().as_slice().iter().all(|r| r.tolerance == 0));
    }

    #[test]
    fn process_image_failure_reports_an_error_response() {
        let mut engine = MaskingEngine::new();
        let response = handle_line(
            &mut engine,
            r#"{"command":"process-image","path":"/definitely/not/here.png"}"#,
        );
        assert!(matches!(response, Response::Error { .. }));
        assert!(!engine.has_image());
    }

    #[test]
    fn loop_answers_every_line_and_survives_bad_ones() {
        let mut engine = MaskingEngine::new();
        let input = concat!(
            "{\"command\":\"add-color\",\"color\":[1,2,3]}\n",
            "garbage\n",
            "{\"command\":\"clear-colors\"}\n",
        );
        let mut output = Vec::new();

        run(&mut engine, input.as_bytes(), &mut output).unwrap();

        let lines: Vec<&str> = std::str::from_utf8(&output).unwrap().lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#"{"status":"success"}"#);
        assert!(lines[1].starts_with(r#"{"status":"error""#));
        assert_eq!(lines[2], r#"{"status":"success"}"#);
        assert!(engine.rules().is_empty());
    }
}
