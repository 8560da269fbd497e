mod codec;
mod command;
mod sequence;
