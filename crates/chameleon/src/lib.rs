//! Chameleon creates SVG sprites where the colours and stroke widths of each icon can be
//! restyled with CSS variables.
pub mod args;
pub mod commands;
pub mod config;
pub mod report;
pub mod walk;

#[cfg(test)]
#[ctor::ctor]
fn init_test() {
    let _ = env_logger::builder().is_test(true).try_init();
}
