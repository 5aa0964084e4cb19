pub mod lineups;
pub mod maps;
pub mod meta;
pub mod players;
