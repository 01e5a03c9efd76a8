mod boundaries;
mod logging;
mod tasks;
