use crate::engine::GridError;

/// One host event, read as a line of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pointer activation of a cell; routes to `expand`.
    Activate { index: usize },
    /// Stepper adjustment; routes to `narrow`.
    Step { index: usize, offset: i64 },
    /// Programmatic selection; routes to `set_selection`.
    Select { start: usize, end: usize },
    /// External reset to nothing selected.
    Clear,
    /// Re-emit the current view.
    Show,
}

/// Parse a command line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, GridError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let cmd = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("activate", [index]) => Command::Activate {
            index: parse_arg(index, line)?,
        },
        ("step", [index, offset]) => Command::Step {
            index: parse_arg(index, line)?,
            offset: parse_arg(offset, line)?,
        },
        ("select", [start, end]) => Command::Select {
            start: parse_arg(start, line)?,
            end: parse_arg(end, line)?,
        },
        ("clear", []) => Command::Clear,
        ("show", []) => Command::Show,
        _ => return Err(GridError::InvalidCommand(line.to_string())),
    };
    Ok(Some(cmd))
}

fn parse_arg<T: std::str::FromStr>(arg: &str, line: &str) -> Result<T, GridError> {
    arg.parse()
        .map_err(|_| GridError::InvalidCommand(format!("{line}: bad argument {arg:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_activate() {
        assert_eq!(
            parse_command("activate 3").unwrap(),
            Some(Command::Activate { index: 3 })
        );
    }

    #[test]
    fn parse_step_with_negative_offset() {
        assert_eq!(
            parse_command("  step 2 -1 ").unwrap(),
            Some(Command::Step { index: 2, offset: -1 })
        );
    }

    #[test]
    fn parse_select_clear_show() {
        assert_eq!(
            parse_command("SELECT 1 4").unwrap(),
            Some(Command::Select { start: 1, end: 4 })
        );
        assert_eq!(parse_command("clear").unwrap(), Some(Command::Clear));
        assert_eq!(parse_command("show").unwrap(), Some(Command::Show));
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("# pick the morning").unwrap(), None);
    }

    #[test]
    fn rejects_unknown_and_malformed() {
        for bad in ["drag 1", "activate", "activate -1", "activate x", "step 1", "select 1 2 3", "clear now"] {
            assert!(
                matches!(parse_command(bad), Err(GridError::InvalidCommand(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
