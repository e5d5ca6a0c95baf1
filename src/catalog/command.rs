pub mod book_exists_cmd;
pub mod filter_books_cmd;
pub mod register_book_cmd;
