fn main() -> Result<(), Box<dyn std::error::Error>> {
    playdeck::runtime::run()
}
