mod actions;
mod helpers;
