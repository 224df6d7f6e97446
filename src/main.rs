fn main() -> anyhow::Result<()> {
    iassist_lib::run()
}
