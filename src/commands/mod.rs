// Command handlers behind the CLI
pub mod generate;
pub mod verify;
