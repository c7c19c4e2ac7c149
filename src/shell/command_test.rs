//! Tests for shell command parsing.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::shell::command::{Command, CommandError};

    fn parse(line: &str) -> Result<Command, CommandError> {
        line.parse()
    }

    #[test]
    fn test_get_and_del() {
        assert_eq!(
            parse("get user:1"),
            Ok(Command::Get {
                key: "user:1".into()
            })
        );
        assert_eq!(
            parse("  DEL   user:1 "),
            Ok(Command::Remove {
                key: "user:1".into()
            })
        );
        assert_eq!(
            parse("get"),
            Err(CommandError::Usage {
                command: "get",
                expected: "<key>"
            })
        );
        assert!(parse("get a b").is_err());
    }

    #[test]
    fn test_set_parses_json_or_falls_back_to_string() {
        assert_eq!(
            parse(r#"set user:1 {"name":"alice","age":30}"#),
            Ok(Command::Set {
                key: "user:1".into(),
                value: json!({"name": "alice", "age": 30}),
            })
        );
        assert_eq!(
            parse("set user:1 alice smith"),
            Ok(Command::Set {
                key: "user:1".into(),
                value: json!("alice smith"),
            })
        );
        assert_eq!(
            parse("set n 42"),
            Ok(Command::Set {
                key: "n".into(),
                value: json!(42),
            })
        );
        assert!(matches!(parse("set lonely"), Err(CommandError::Usage { command: "set", .. })));
    }

    #[test]
    fn test_ttl() {
        assert_eq!(
            parse("ttl user:1 5"),
            Ok(Command::Ttl {
                key: "user:1".into(),
                seconds: 5
            })
        );
        assert_eq!(
            parse("ttl user:1 -1"),
            Err(CommandError::InvalidTtl("-1".into()))
        );
        assert!(matches!(parse("ttl user:1"), Err(CommandError::Usage { .. })));
        assert!(matches!(parse("ttl user:1 1 2"), Err(CommandError::Usage { .. })));
    }

    #[test]
    fn test_misc() {
        assert_eq!(parse("help"), Ok(Command::Help));
        assert_eq!(parse("exit"), Ok(Command::Quit));
        assert_eq!(parse("   "), Err(CommandError::Empty));
        assert_eq!(parse("flush"), Err(CommandError::Unknown("flush".into())));
    }
}
