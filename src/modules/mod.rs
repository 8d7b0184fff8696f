/// Tasks CRUD module, mounted under `/tasks`.
pub mod tasks;
