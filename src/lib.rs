pub mod cli;
pub mod config;
pub mod device;
pub mod forward;
pub mod lab;
pub mod net;
pub mod sim;
pub mod stp;

#[cfg(test)]
mod test;
