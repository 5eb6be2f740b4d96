/*
[INPUT]:  Parsed CLI subcommands
[OUTPUT]: Command implementations for the grabdeck binary
[POS]:    CLI module root
[UPDATE]: When adding a subcommand module
*/

pub mod commands;
pub mod init;
pub mod watch;
