use crate::auth::session_service::SessionService;
use crate::console::commands::{
    CommandContext, CommandOutcome, CommandOutput, ConsoleCommand, DeleteUserCommand,
    HelpCommand, ListUsersCommand, ResetCommand, StopCommand,
};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Console commands by name. Built once at startup and handed to the dispatcher.
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Box<dyn ConsoleCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    pub fn with_default_commands() -> Self {
        let mut registry = Self::new();
        registry.register("help", Box::new(HelpCommand));
        registry.register("stop", Box::new(StopCommand));
        registry.register("reset", Box::new(ResetCommand));
        registry.register("list_users", Box::new(ListUsersCommand));
        registry.register("delete_user", Box::new(DeleteUserCommand));
        registry
    }

    pub fn register(&mut self, name: &'static str, command: Box<dyn ConsoleCommand>) {
        info!("Registering console command: {name}");
        self.commands.insert(name, command);
    }

    pub fn usages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.values().map(|command| command.usage())
    }

    /// Runs one console line. Failures and unknown commands are reported in the
    /// output, they never stop the console.
    pub async fn dispatch(&self, session_service: &SessionService, line: &str) -> CommandOutput {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return CommandOutput::lines(vec![]);
        };
        let args: Vec<&str> = parts.collect();
        let context = CommandContext {
            session_service,
            registry: self,
        };

        let Some(command) = self.commands.get(name) else {
            let mut output = match self.commands.get("help") {
                Some(help) => help
                    .execute(&context, &[])
                    .await
                    .unwrap_or_else(|_| CommandOutput::lines(vec![])),
                None => CommandOutput::lines(vec![]),
            };
            output.lines.insert(0, format!("Unknown command: {name}"));
            return output;
        };

        match command.execute(&context, &args).await {
            Ok(output) => output,
            Err(err) => {
                warn!("Console command: {name} has failed. Error: {err}");
                CommandOutput {
                    lines: vec![format!("Error executing command: {err}")],
                    outcome: CommandOutcome::Continue,
                }
            }
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::with_default_commands()
    }
}
