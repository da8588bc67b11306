fn main() {
    dotenv::dotenv().ok();
    nlsql::app::logging::init();
    nlsql::app::cli::run();
}
