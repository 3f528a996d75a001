//! Help command - displays available commands.

use crate::commands::CommandHandler;
use crate::error::AppResult;
use async_trait::async_trait;

pub struct HelpHandler;

impl HelpHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HelpHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    fn trigger(&self) -> Option<&str> {
        Some("/help")
    }

    async fn execute(&self, _line: &str) -> AppResult<String> {
        Ok(r#"Gemini AI chat

Just type a message to chat in the current room.

Account:
  /countries [filter]                      List dial codes
  /login <dial-code> <phone>               Log in with a one-time code
  /signup <dial-code> <phone> <email> <name>
  /otp <code>                              Enter the 6-digit code
  /resend                                  Request a new code
  /logout

Rooms:
  /new <title>                             Create and open a room
  /rooms [query]                           List or search rooms
  /select <n|id>                           Open a room
  /delete <n|id>                           Delete a room

Other:
  /image <url> [caption]                   Share an image
  /dark                                    Toggle dark mode
  /help                                    Show this message

Codes are simulated: the code is printed instead of sent by SMS."#
            .into())
    }
}
