use mcgscope_core::bit_string;

use super::ConfigOverrides;

pub fn run(overrides: &ConfigOverrides, count: usize, normalized: bool) {
    let (_, mut generator) = super::load(overrides);
    let params = generator.params();
    let width = generator.bit_width();

    println!(
        "x = ({} * x + {}) mod {}, x0 = {}  ({width} bits)\n",
        params.multiplier, params.increment, params.modulus, params.seed
    );

    for i in 1..=count {
        if normalized {
            println!("  {i:>6}  {:.12}", generator.normalized_advance());
            continue;
        }
        let value = generator.advance();
        match bit_string(value, width) {
            Ok(bits) => println!("  {i:>6}  {value:>20}  {bits}"),
            Err(_) => println!("  {i:>6}  {value:>20}"),
        }
    }
}
