//! Interactive command loop

use anyhow::Result;
use launcher_client::ClientApi;
use serde_json::{json, Value};
use std::io::Write;
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, error};

use crate::command::{Command, ContainerAction, ParseError, ScriptAction, HELP};
use crate::render;
use crate::trigger::{self, TriggerCommand, TRIGGER_TYPES};

const PROMPT: &str = "slm> ";
const TRIGGER_PROMPT: &str = "trigger> ";
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

pub struct Repl {
    api: ClientApi,
    lines: Lines<BufReader<Stdin>>,
}

impl Repl {
    pub fn new(api: ClientApi) -> Self {
        Self {
            api,
            lines: BufReader::new(stdin()).lines(),
        }
    }

    /// Next trimmed input line. `None` on EOF or Ctrl-C.
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        std::io::stdout().flush()?;

        tokio::select! {
            line = self.lines.next_line() => Ok(line?.map(|l| l.trim().to_string())),
            _ = tokio::signal::ctrl_c() => {
                println!();
                Ok(None)
            }
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("Type \"help\" for available commands\n");

        while let Some(line) = self.read_line(PROMPT).await? {
            if line.is_empty() {
                continue;
            }
            debug!("Command: {}", line);

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(ParseError::Unknown(name)) => {
                    println!(
                        "✗ Unknown command: {}. Type \"help\" for available commands",
                        name
                    );
                    continue;
                }
                Err(e) => {
                    println!("✗ {}", e);
                    continue;
                }
            };

            match command {
                Command::Exit => break,
                Command::Trigger => {
                    if !self.trigger_mode().await? {
                        break;
                    }
                }
                command => {
                    if let Err(e) = self.execute(command).await {
                        error!("Command failed: {}", e);
                        println!("{}", render::error(&e));
                    }
                }
            }
        }

        self.api.disconnect();
        println!("Goodbye!");
        Ok(())
    }

    async fn execute(&self, command: Command) -> launcher_client::Result<()> {
        let api = &self.api;

        match command {
            Command::Create { path, data, fs } => {
                api.create_file(&path, &data, fs.as_deref()).await?;
                println!("✓ File created: {}", path);
            }
            Command::Read { path, fs } => match api.read_file(&path, fs.as_deref()).await? {
                Value::Null => println!("✗ File not found: {}", path),
                data => println!("{}", render::content(&data)),
            },
            Command::Update { path, data, fs } => {
                if api.update_file(&path, &data, fs.as_deref()).await? == json!(true) {
                    println!("✓ File updated: {}", path);
                } else {
                    println!("✗ File not found: {}", path);
                }
            }
            Command::Delete { path, fs } => {
                if api.delete_file(&path, fs.as_deref()).await? == json!(true) {
                    println!("✓ File deleted: {}", path);
                } else {
                    println!("✗ File not found: {}", path);
                }
            }
            Command::Exists { path, fs } => {
                if api.file_exists(&path, fs.as_deref()).await? == json!(true) {
                    println!("✓ File exists: {}", path);
                } else {
                    println!("✗ File does not exist: {}", path);
                }
            }
            Command::FileInfo { path, fs } => match api.file_info(&path, fs.as_deref()).await? {
                Value::Null => println!("✗ File not found: {}", path),
                info => println!("{}", render::file_info(&path, &info)),
            },
            Command::List { fs } => {
                let files = api.list_files(fs.as_deref()).await?;
                println!("{}", render::file_list(fs.as_deref(), &files));
            }
            Command::Stats { fs } => {
                let stats = api.fs_stats(fs.as_deref()).await?;
                println!("{}", render::fs_stats(fs.as_deref(), &stats));
            }
            Command::Container(action) => match action {
                ContainerAction::List => {
                    let listing = api.container_list().await?;
                    println!("{}", render::entries("Containers", &listing, "containers"));
                }
                ContainerAction::Start(id) => {
                    api.container_start(&id).await?;
                    println!("✓ Container started: {}", id);
                }
                ContainerAction::Stop(id) => {
                    api.container_stop(&id).await?;
                    println!("✓ Container stopped: {}", id);
                }
                ContainerAction::Remove(id) => {
                    api.container_remove(&id).await?;
                    println!("✓ Container removed: {}", id);
                }
            },
            Command::Script(action) => match action {
                ScriptAction::List => {
                    let listing = api.script_list().await?;
                    println!("{}", render::entries("Scripts", &listing, "scripts"));
                }
                ScriptAction::Execute { path, args } => {
                    let result = api.script_execute(&path, json!(args)).await?;
                    println!("✓ Script submitted: {}\n{}", path, render::pretty(&result));
                }
                ScriptAction::Status(id) => {
                    let status = api.script_status(&id).await?;
                    println!("{}", render::pretty(&status));
                }
            },
            Command::Status => {
                let status = api.system_status().await?;
                println!("{}", render::system_status(&status));
            }
            Command::ServerInfo => {
                let info = api.server_info().await?;
                println!("{}", render::server_info(&info));
            }
            Command::Help => println!("{}", HELP),
            Command::Clear => print!("{}", CLEAR_SCREEN),
            // Handled by the loop
            Command::Trigger | Command::Exit => {}
        }

        Ok(())
    }

    /// Nested trigger management loop. Returns `false` when input ended.
    async fn trigger_mode(&mut self) -> Result<bool> {
        println!("Trigger management mode. Type \"help\" for commands, \"exit\" to go back\n");

        loop {
            let Some(line) = self.read_line(TRIGGER_PROMPT).await? else {
                return Ok(false);
            };
            if line.is_empty() {
                continue;
            }

            let command = match TriggerCommand::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    println!("✗ {}", e);
                    continue;
                }
            };

            match command {
                TriggerCommand::Exit => {
                    println!("Back to the main prompt");
                    return Ok(true);
                }
                TriggerCommand::Help => println!("{}", trigger::help()),
                TriggerCommand::List => println!("{}", TRIGGER_TYPES),
                TriggerCommand::Clear => print!("{}", CLEAR_SCREEN),
                TriggerCommand::Status => match self.api.components().await {
                    Ok(components) => {
                        let available = components
                            .as_array()
                            .is_some_and(|names| names.iter().any(|n| n == "trigger"));
                        if available {
                            println!("✓ Trigger component available");
                        } else {
                            println!("✗ Trigger component not available");
                        }
                    }
                    Err(e) => println!("{}", render::error(&e)),
                },
                TriggerCommand::Call { method, params } => {
                    debug!("Trigger call: {}", method);
                    match self.api.call(method, params).await {
                        Ok(result) => println!("✓ {}", render::pretty(&result)),
                        Err(e) => {
                            error!("{} failed: {}", method, e);
                            println!("{}", render::error(&e));
                        }
                    }
                }
            }
        }
    }
}
