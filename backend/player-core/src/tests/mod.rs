mod catalog;
mod config;
mod mpv;
