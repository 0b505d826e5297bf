//! The nb-bridge command-line executable.

fn main() -> anyhow::Result<()> {
    nb_bridge::run()
}
