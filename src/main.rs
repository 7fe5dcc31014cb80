fn main() {
    linepipe::app::startup::startup();
}
