fn main() -> eframe::Result {
    crop_tool::run_native()
}
