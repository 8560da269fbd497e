mod catalog;
mod helpers;
mod mpv;
