use bfin::Bfin;
use bfin_util_error::WhateverResult;

#[snafu::report]
fn main() -> WhateverResult<()> {
    Bfin::run()
}
