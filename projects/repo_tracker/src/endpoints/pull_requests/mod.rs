pub mod list { pub mod index; }
