// Primitive polynomial search over GF(q). A monic polynomial p of degree n
// with non-zero constant term is primitive iff x has multiplicative order
// exactly q^n - 1 modulo p.

use super::words::Word;
use crate::error::ConfigError;
use crate::field::{GaloisField, Symbol};
use tracing::debug;

/// Distinct prime factors by trial division.
fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    let mut p = 2;
    while p * p <= n {
        if n % p == 0 {
            factors.push(p);
            while n % p == 0 {
                n /= p;
            }
        }
        p += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

/// Reduces `value` (lowest degree first) modulo the monic `modulus`
/// (leading coefficient first), leaving `degree` coefficients.
fn reduce(field: &GaloisField, modulus: &[Symbol], mut value: Word) -> Word {
    let degree = modulus.len() - 1;
    for d in (degree..value.len()).rev() {
        let c = value[d];
        if c == 0 {
            continue;
        }
        value[d] = 0;
        // x^n = -(c1 x^(n-1) + ... + cn)
        for (k, &coefficient) in modulus.iter().enumerate().skip(1) {
            let term = field.mul(c, field.neg(coefficient));
            value[d - k] = field.add(value[d - k], term);
        }
    }
    value.truncate(degree);
    value.resize(degree, 0);
    value
}

fn mul_mod(field: &GaloisField, modulus: &[Symbol], a: &[Symbol], b: &[Symbol]) -> Word {
    let mut product = vec![0; a.len() + b.len()];
    for (i, &x) in a.iter().enumerate().filter(|(_, x)| **x != 0) {
        for (j, &y) in b.iter().enumerate() {
            product[i + j] = field.add(product[i + j], field.mul(x, y));
        }
    }
    reduce(field, modulus, product)
}

/// x^exponent mod `modulus`.
fn pow_x(field: &GaloisField, modulus: &[Symbol], mut exponent: u64) -> Word {
    let degree = modulus.len() - 1;
    let mut result = reduce(field, modulus, vec![1]);
    let mut base = reduce(field, modulus, vec![0, 1]);
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = mul_mod(field, modulus, &result, &base);
        }
        base = mul_mod(field, modulus, &base, &base);
        exponent >>= 1;
    }
    debug_assert_eq!(result.len(), degree);
    result
}

fn is_one(residue: &[Symbol]) -> bool {
    residue.first() == Some(&1) && residue[1..].iter().all(|&c| c == 0)
}

/// Multiplicative group order q^length - 1, if it fits.
fn group_order(field_size: u8, length: usize) -> Option<u64> {
    let exponent = u32::try_from(length).ok()?;
    u64::from(field_size).checked_pow(exponent).map(|n| n - 1)
}

/// Group order together with its distinct prime factors.
struct Order {
    order: u64,
    factors: Vec<u64>,
}

impl Order {
    fn new(field_size: u8, length: usize) -> Option<Self> {
        let order = group_order(field_size, length)?;
        Some(Self {
            order,
            factors: prime_factors(order),
        })
    }

    /// True when x has exactly this order modulo the monic `polynomial`.
    fn generated_by_x(&self, field: &GaloisField, polynomial: &[Symbol]) -> bool {
        is_one(&pow_x(field, polynomial, self.order))
            && self
                .factors
                .iter()
                .all(|&r| !is_one(&pow_x(field, polynomial, self.order / r)))
    }
}

fn well_formed(field: &GaloisField, polynomial: &[Symbol]) -> bool {
    polynomial.len() >= 2
        && polynomial[0] == 1
        && polynomial[polynomial.len() - 1] != 0
        && polynomial.iter().all(|&c| field.contains(c))
}

/// Tests a polynomial given leading coefficient first.
pub fn is_primitive(field: &GaloisField, polynomial: &[Symbol]) -> bool {
    well_formed(field, polynomial)
        && Order::new(field.size(), polynomial.len() - 1)
            .is_some_and(|order| order.generated_by_x(field, polynomial))
}

/// Iterates every primitive polynomial of degree `length` over GF(q) in
/// search order: trailing coefficient fastest, starting at x^n + 1.
fn search(field: &GaloisField, length: usize) -> impl Iterator<Item = Word> + '_ {
    let q = field.size();
    let mut candidate = vec![0; length + 1];
    candidate[0] = 1;
    if length > 0 {
        candidate[length] = 1;
    }
    let order = if length == 0 { None } else { Order::new(q, length) };
    let mut exhausted = order.is_none();
    std::iter::from_fn(move || {
        let order = order.as_ref()?;
        while !exhausted {
            let current = candidate.clone();
            // odometer increment over c1..cn, with cn restricted to [1, q)
            exhausted = true;
            for i in (1..=length).rev() {
                candidate[i] += 1;
                if candidate[i] < q {
                    exhausted = false;
                    break;
                }
                candidate[i] = if i == length { 1 } else { 0 };
            }
            if order.generated_by_x(field, &current) {
                return Some(current);
            }
        }
        None
    })
}

/// First primitive polynomial of degree `length` over GF(`field_size`).
pub fn find_primitive(field_size: u32, length: usize) -> Result<Word, ConfigError> {
    let field = GaloisField::new(field_size)?;
    let found = search(&field, length).next();
    found
        .inspect(|polynomial| debug!(?polynomial, field_size, length, "found primitive"))
        .ok_or(ConfigError::NoPrimitive { field_size, length })
}

/// All primitive polynomials of degree `length`, in search order.
pub fn primitives(field_size: u32, length: usize) -> Result<Vec<Word>, ConfigError> {
    let field = GaloisField::new(field_size)?;
    Ok(search(&field, length).collect())
}

/// First primitive polynomial with exactly three non-zero coefficients.
pub fn trinomial(field_size: u32, length: usize) -> Result<Word, ConfigError> {
    let field = GaloisField::new(field_size)?;
    let found = search(&field, length)
        .find(|polynomial| polynomial.iter().filter(|&&c| c != 0).count() == 3);
    found.ok_or(ConfigError::NoPrimitive { field_size, length })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prime_factors() {
        assert_eq!(prime_factors(1), Vec::<u64>::new());
        assert_eq!(prime_factors(15), vec![3, 5]);
        assert_eq!(prime_factors(1023), vec![3, 11, 31]);
        assert_eq!(prime_factors(31), vec![31]);
    }

    #[test]
    fn test_binary_primitives() {
        assert_eq!(find_primitive(2, 1).unwrap(), vec![1, 1]);
        assert_eq!(find_primitive(2, 3).unwrap(), vec![1, 0, 1, 1]);
        assert_eq!(find_primitive(2, 4).unwrap(), vec![1, 0, 0, 1, 1]);
        assert_eq!(find_primitive(2, 5).unwrap(), vec![1, 0, 0, 1, 0, 1]);
    }

    #[test]
    fn test_primitive_counts() {
        // phi(q^n - 1) / n
        assert_eq!(primitives(2, 4).unwrap().len(), 2);
        assert_eq!(primitives(2, 5).unwrap().len(), 6);
        assert_eq!(primitives(4, 1).unwrap(), vec![vec![1, 2], vec![1, 3]]);
        assert_eq!(primitives(4, 2).unwrap().len(), 4);
        assert_eq!(primitives(8, 1).unwrap().len(), 6);
    }

    #[test]
    fn test_rejects_non_primitive() {
        let gf2 = GaloisField::new(2).unwrap();
        // x^4 + x^3 + x^2 + x + 1 is irreducible with period 5
        assert!(!is_primitive(&gf2, &[1, 1, 1, 1, 1]));
        // x^5 + x + 1 = (x^2 + x + 1)(x^3 + x^2 + 1)
        assert!(!is_primitive(&gf2, &[1, 0, 0, 0, 1, 1]));
        assert!(!is_primitive(&gf2, &[1, 0, 1, 0]));
        assert!(is_primitive(&gf2, &[1, 1, 0, 0, 1]));
    }

    #[test]
    fn test_search_is_deterministic() {
        for size in [4, 8, 16] {
            let first = find_primitive(size, 3).unwrap();
            assert_eq!(first, find_primitive(size, 3).unwrap());
            let field = GaloisField::new(size).unwrap();
            assert!(is_primitive(&field, &first));
        }
    }

    #[test]
    fn test_shared_order_matches_is_primitive() {
        let gf2 = GaloisField::new(2).unwrap();
        let order = Order::new(2, 5).unwrap();
        assert_eq!((order.order, order.factors.clone()), (31, vec![31]));
        let listed = primitives(2, 5).unwrap();
        for bits in 0..16u8 {
            let mut polynomial = vec![1];
            polynomial.extend((0..4).rev().map(|k| (bits >> k) & 1));
            polynomial.push(1);
            let primitive = is_primitive(&gf2, &polynomial);
            assert_eq!(order.generated_by_x(&gf2, &polynomial), primitive);
            assert_eq!(listed.contains(&polynomial), primitive);
        }
    }

    #[test]
    fn test_trinomial() {
        assert_eq!(trinomial(2, 5).unwrap(), vec![1, 0, 0, 1, 0, 1]);
        assert_eq!(trinomial(2, 4).unwrap(), vec![1, 0, 0, 1, 1]);
        assert_eq!(trinomial(2, 3).unwrap(), vec![1, 0, 1, 1]);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(matches!(
            find_primitive(2, 0),
            Err(ConfigError::NoPrimitive { length: 0, .. })
        ));
        assert!(matches!(
            find_primitive(3, 2),
            Err(ConfigError::BadFieldSize(3))
        ));
    }
}
