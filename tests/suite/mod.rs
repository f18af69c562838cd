mod search;
mod trigger;
