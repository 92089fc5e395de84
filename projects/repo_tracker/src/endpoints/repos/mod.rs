pub mod list { pub mod index; }
pub mod get { pub mod index; }
pub mod add { pub mod index; }
pub mod delete { pub mod index; }
