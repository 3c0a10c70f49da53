use clap::Parser;

pub const USAGE: &str = "Usage: chat \"your message here\"\n       chat new";

const BUILTIN_FLAGS: [&str; 4] = ["-h", "--help", "-V", "--version"];

#[derive(Parser, Debug)]
#[command(name = "chat")]
#[command(version, about = "CLI tool for chatting with ChatGPT")]
pub struct Cli {
    /// Message to send, or `new` to start a new conversation
    #[arg(value_name = "MESSAGE", trailing_var_arg = true, allow_hyphen_values = true)]
    pub message: Vec<String>,
}

/// What a single invocation asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewConversation,
    Send(String),
}

impl Cli {
    /// Builds the invocation from raw arguments (program name excluded).
    ///
    /// Every word is message text. The only exception is a lone help or
    /// version flag, which clap prints before exiting.
    pub fn from_args(args: Vec<String>) -> Self {
        match args.as_slice() {
            [flag] if BUILTIN_FLAGS.contains(&flag.as_str()) => {
                Self::parse_from(std::iter::once("chat".to_string()).chain(args))
            }
            _ => Self { message: args },
        }
    }

    /// Resolves the positional words into a command. `None` means there is
    /// nothing to send.
    pub fn command(&self) -> Option<Command> {
        if self.message.first().map(String::as_str) == Some("new") {
            return Some(Command::NewConversation);
        }

        let message = self.message.join(" ");
        if message.is_empty() {
            None
        } else {
            Some(Command::Send(message))
        }
    }
}
