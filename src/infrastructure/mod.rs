pub mod csv_loader;
pub mod news;
pub mod report_writer;
