pub mod book_server;
