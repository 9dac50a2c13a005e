// Colored console output.

use crossterm::style::Stylize;

pub fn banner(msg: &str) {
    println!("{}", msg.magenta().bold());
}

pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

pub fn success(msg: &str) {
    println!("{}", msg.green());
}

pub fn error(msg: &str) {
    println!("{}", msg.red());
}
