use hls::driver;
use hls_utils::MultiError;

fn main() -> Result<(), MultiError> {
    driver::run_driver()
}
