//! REPL command parsing

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Unterminated quote")]
    UnterminatedQuote,

    #[error("Invalid JSON argument: {0}")]
    InvalidJson(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContainerAction {
    List,
    Start(String),
    Stop(String),
    Remove(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptAction {
    List,
    Execute { path: String, args: Vec<String> },
    Status(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create {
        path: String,
        data: String,
        fs: Option<String>,
    },
    Read {
        path: String,
        fs: Option<String>,
    },
    Update {
        path: String,
        data: String,
        fs: Option<String>,
    },
    Delete {
        path: String,
        fs: Option<String>,
    },
    Exists {
        path: String,
        fs: Option<String>,
    },
    FileInfo {
        path: String,
        fs: Option<String>,
    },
    List {
        fs: Option<String>,
    },
    Stats {
        fs: Option<String>,
    },
    Container(ContainerAction),
    Script(ScriptAction),
    Status,
    ServerInfo,
    Trigger,
    Help,
    Clear,
    Exit,
}

/// Split a line on whitespace. Single or double quotes group words and are removed.
pub fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ParseError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn arg(args: &[String], index: usize, usage: &'static str) -> Result<String, ParseError> {
    args.get(index).cloned().ok_or(ParseError::Usage(usage))
}

fn optional(args: &[String], index: usize) -> Option<String> {
    args.get(index).cloned()
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(line)?;
        let Some((name, args)) = tokens.split_first() else {
            return Err(ParseError::Usage("help"));
        };

        let command = match name.to_lowercase().as_str() {
            "create" => {
                const USAGE: &str = "create <path> <data> [fsName]";
                Command::Create {
                    path: arg(args, 0, USAGE)?,
                    data: arg(args, 1, USAGE)?,
                    fs: optional(args, 2),
                }
            }
            "read" => Command::Read {
                path: arg(args, 0, "read <path> [fsName]")?,
                fs: optional(args, 1),
            },
            "update" => {
                const USAGE: &str = "update <path> <data> [fsName]";
                Command::Update {
                    path: arg(args, 0, USAGE)?,
                    data: arg(args, 1, USAGE)?,
                    fs: optional(args, 2),
                }
            }
            "delete" => Command::Delete {
                path: arg(args, 0, "delete <path> [fsName]")?,
                fs: optional(args, 1),
            },
            "exists" => Command::Exists {
                path: arg(args, 0, "exists <path> [fsName]")?,
                fs: optional(args, 1),
            },
            "info" if args.is_empty() => Command::ServerInfo,
            "info" => Command::FileInfo {
                path: arg(args, 0, "info <path> [fsName]")?,
                fs: optional(args, 1),
            },
            "list" => Command::List {
                fs: optional(args, 0),
            },
            "stats" => Command::Stats {
                fs: optional(args, 0),
            },
            "container" => Command::Container(parse_container(args)?),
            "script" => Command::Script(parse_script(args)?),
            "status" => Command::Status,
            "trigger" => Command::Trigger,
            "help" => Command::Help,
            "clear" => Command::Clear,
            "exit" | "quit" => Command::Exit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

fn parse_container(args: &[String]) -> Result<ContainerAction, ParseError> {
    const USAGE: &str = "container <list|start|stop|remove> [containerId]";
    let action = arg(args, 0, USAGE)?;

    match action.as_str() {
        "list" => Ok(ContainerAction::List),
        "start" => Ok(ContainerAction::Start(arg(
            args,
            1,
            "container start <containerId>",
        )?)),
        "stop" => Ok(ContainerAction::Stop(arg(
            args,
            1,
            "container stop <containerId>",
        )?)),
        "remove" => Ok(ContainerAction::Remove(arg(
            args,
            1,
            "container remove <containerId>",
        )?)),
        _ => Err(ParseError::Usage(USAGE)),
    }
}

fn parse_script(args: &[String]) -> Result<ScriptAction, ParseError> {
    const USAGE: &str = "script <list|execute|status> [options]";
    let action = arg(args, 0, USAGE)?;

    match action.as_str() {
        "list" => Ok(ScriptAction::List),
        "execute" => Ok(ScriptAction::Execute {
            path: arg(args, 1, "script execute <scriptPath> [args...]")?,
            args: args.iter().skip(2).cloned().collect(),
        }),
        "status" => Ok(ScriptAction::Status(arg(
            args,
            1,
            "script status <scriptId>",
        )?)),
        _ => Err(ParseError::Usage(USAGE)),
    }
}

pub const HELP: &str = "\
Available commands:

File operations (default file system: local):
  create <path> <data> [fsName]  - Create a file
  read <path> [fsName]           - Read a file
  update <path> <data> [fsName]  - Update a file
  delete <path> [fsName]         - Delete a file
  exists <path> [fsName]         - Check whether a file exists
  list [fsName]                  - List files
  info <path> [fsName]           - Show file info
  stats [fsName]                 - Show file system statistics

Containers:
  container list                 - List containers
  container start <id>           - Start a container
  container stop <id>            - Stop a container
  container remove <id>          - Remove a container

Scripts:
  script list                    - List scripts
  script execute <path> [args]   - Execute a script
  script status <id>             - Show script status

System:
  status                         - Show system status
  info                           - Show server info
  trigger                        - Enter trigger management mode

Other:
  help                           - Show this help
  clear                          - Clear the screen
  exit, quit                     - Leave the REPL
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"create /a.txt "hello world" memory"#).unwrap(),
            vec!["create", "/a.txt", "hello world", "memory"]
        );
        assert_eq!(
            tokenize(r#"event update 1 '{"enabled": false}'"#).unwrap(),
            vec!["event", "update", "1", r#"{"enabled": false}"#]
        );
        assert_eq!(tokenize("   ").unwrap(), Vec::<String>::new());
        assert_eq!(tokenize("create ''").unwrap(), vec!["create", ""]);
        assert_eq!(tokenize("read 'oops"), Err(ParseError::UnterminatedQuote));
    }

    #[test]
    fn test_parse_file_commands() {
        assert_eq!(
            Command::parse("create /a.txt hi memory").unwrap(),
            Command::Create {
                path: "/a.txt".to_string(),
                data: "hi".to_string(),
                fs: Some("memory".to_string()),
            }
        );
        assert_eq!(
            Command::parse("READ /a.txt").unwrap(),
            Command::Read {
                path: "/a.txt".to_string(),
                fs: None,
            }
        );
        assert_eq!(Command::parse("list").unwrap(), Command::List { fs: None });
    }

    #[test]
    fn test_info_without_args_is_server_info() {
        assert_eq!(Command::parse("info").unwrap(), Command::ServerInfo);
        assert_eq!(
            Command::parse("info /a.txt git").unwrap(),
            Command::FileInfo {
                path: "/a.txt".to_string(),
                fs: Some("git".to_string()),
            }
        );
    }

    #[test]
    fn test_usage_errors() {
        assert_eq!(
            Command::parse("create /a.txt"),
            Err(ParseError::Usage("create <path> <data> [fsName]"))
        );
        assert_eq!(
            Command::parse("container start"),
            Err(ParseError::Usage("container start <containerId>"))
        );
        assert!(matches!(
            Command::parse("container explode"),
            Err(ParseError::Usage(_))
        ));
        assert_eq!(
            Command::parse("frobnicate"),
            Err(ParseError::Unknown("frobnicate".to_string()))
        );
    }

    #[test]
    fn test_script_execute_collects_args() {
        assert_eq!(
            Command::parse("script execute deploy.sh --env prod").unwrap(),
            Command::Script(ScriptAction::Execute {
                path: "deploy.sh".to_string(),
                args: vec!["--env".to_string(), "prod".to_string()],
            })
        );
    }

    #[test]
    fn test_exit_aliases() {
        assert_eq!(Command::parse("exit").unwrap(), Command::Exit);
        assert_eq!(Command::parse("quit").unwrap(), Command::Exit);
    }
}
