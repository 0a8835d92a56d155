// Finite field arithmetic over GF(2^m) for the field sizes guided scrambling
// supports. Multiplication and division are table driven; the tables are
// built once per session from a fixed reduction polynomial.

use crate::error::ConfigError;

/// A field element, always in `[0, q)` for the session's field.
pub type Symbol = u8;

/// Field sizes with their reduction polynomials (bit i = coefficient of x^i).
const REDUCTION_POLYNOMIALS: [(u8, u8); 4] = [
    (2, 0b11),     // x + 1
    (4, 0b111),    // x^2 + x + 1
    (8, 0b1011),   // x^3 + x + 1
    (16, 0b10011), // x^4 + x + 1
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GaloisField {
    size: u8,
    mul: Vec<Symbol>,
    div: Vec<Symbol>,
}

impl GaloisField {
    pub fn new(size: u32) -> Result<Self, ConfigError> {
        let reduction = REDUCTION_POLYNOMIALS
            .iter()
            .find(|(q, _)| u32::from(*q) == size)
            .map(|&(_, poly)| poly)
            .ok_or(ConfigError::BadFieldSize(size))?;
        let q = size as usize;
        let order = q - 1;

        // x is a generator of the multiplicative group for every entry above
        let mut exp = vec![0 as Symbol; order];
        let mut log = vec![0usize; q];
        let mut x: u16 = 1;
        for (i, slot) in exp.iter_mut().enumerate() {
            *slot = x as Symbol;
            log[x as usize] = i;
            x <<= 1;
            if x & size as u16 != 0 {
                x ^= u16::from(reduction);
            }
        }

        let mut mul = vec![0; q * q];
        let mut div = vec![0; q * q];
        for a in 1..q {
            for b in 1..q {
                mul[a * q + b] = exp[(log[a] + log[b]) % order];
                div[a * q + b] = exp[(log[a] + order - log[b]) % order];
            }
        }

        Ok(Self {
            size: size as u8,
            mul,
            div,
        })
    }

    /// Number of elements q.
    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        symbol < self.size
    }

    #[inline]
    pub fn add(&self, a: Symbol, b: Symbol) -> Symbol {
        a ^ b
    }

    /// Characteristic 2: subtraction is addition.
    #[inline]
    pub fn sub(&self, a: Symbol, b: Symbol) -> Symbol {
        a ^ b
    }

    #[inline]
    pub fn neg(&self, a: Symbol) -> Symbol {
        a
    }

    #[inline]
    pub fn mul(&self, a: Symbol, b: Symbol) -> Symbol {
        self.mul[a as usize * self.size as usize + b as usize]
    }

    /// Division by a non-zero element. Dividing by zero yields zero; callers
    /// that cannot rule it out use [`GaloisField::checked_div`].
    #[inline]
    pub fn div(&self, a: Symbol, b: Symbol) -> Symbol {
        self.div[a as usize * self.size as usize + b as usize]
    }

    pub fn checked_div(&self, a: Symbol, b: Symbol) -> Option<Symbol> {
        (b != 0).then(|| self.div(a, b))
    }

    /// Multiplicative inverse, `None` for zero.
    pub fn inv(&self, a: Symbol) -> Option<Symbol> {
        self.checked_div(1, a)
    }

    pub fn elements(&self) -> std::ops::Range<Symbol> {
        0..self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unsupported_sizes() {
        for size in [0, 1, 3, 5, 6, 7, 9, 32, 256] {
            assert!(matches!(
                GaloisField::new(size),
                Err(ConfigError::BadFieldSize(s)) if s == size
            ));
        }
    }

    #[test]
    fn test_gf4_tables() {
        let field = GaloisField::new(4).unwrap();
        let mul = [
            [0, 0, 0, 0],
            [0, 1, 2, 3],
            [0, 2, 3, 1],
            [0, 3, 1, 2],
        ];
        for a in 0..4u8 {
            for b in 0..4u8 {
                assert_eq!(field.mul(a, b), mul[a as usize][b as usize]);
            }
        }
        assert_eq!(field.inv(2), Some(3));
        assert_eq!(field.inv(0), None);
    }

    #[test]
    fn test_gf8_and_gf16_rows() {
        let gf8 = GaloisField::new(8).unwrap();
        let row: Vec<_> = gf8.elements().map(|b| gf8.mul(2, b)).collect();
        assert_eq!(row, vec![0, 2, 4, 6, 3, 1, 7, 5]);

        let gf16 = GaloisField::new(16).unwrap();
        let row: Vec<_> = gf16.elements().map(|b| gf16.mul(2, b)).collect();
        assert_eq!(
            row,
            vec![0, 2, 4, 6, 8, 10, 12, 14, 3, 1, 7, 5, 11, 9, 15, 13]
        );
    }

    #[test]
    fn test_field_axioms() {
        for size in [2, 4, 8, 16] {
            let field = GaloisField::new(size).unwrap();
            for a in field.elements() {
                assert_eq!(field.add(a, field.neg(a)), 0);
                assert_eq!(field.mul(a, 1), a);
                if a != 0 {
                    let inv = field.inv(a).unwrap();
                    assert_eq!(field.mul(a, inv), 1);
                }
                for b in field.elements() {
                    assert!(field.contains(field.add(a, b)));
                    assert!(field.contains(field.mul(a, b)));
                    assert_eq!(field.mul(a, b), field.mul(b, a));
                    if b != 0 {
                        assert_eq!(field.mul(field.div(a, b), b), a);
                    }
                    for c in field.elements() {
                        assert_eq!(
                            field.mul(a, field.add(b, c)),
                            field.add(field.mul(a, b), field.mul(a, c))
                        );
                    }
                }
            }
        }
    }
}
