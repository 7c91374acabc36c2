pub mod lrc_file_loader;
