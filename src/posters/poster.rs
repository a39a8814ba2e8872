use std::fmt;

/// Symbolic poster identifier.
///
/// The presentation layer maps each identifier to an image asset and a title;
/// this crate only ever deals with the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Poster {
    Madagascar = 0,
    Nemo = 1,
    Shrek = 2,
}

impl Poster {
    /// All posters in successor order.
    pub const ALL: [Poster; 3] = [Poster::Madagascar, Poster::Nemo, Poster::Shrek];

    /// Returns the cyclic successor: madagascar → nemo → shrek → madagascar.
    ///
    /// # Example
    /// ```
    /// use posterswap::Poster;
    ///
    /// let p = Poster::Shrek;
    /// assert_eq!(p.next(), Poster::Madagascar);
    /// assert_eq!(p.next().next().next(), p);
    /// ```
    pub fn next(self) -> Self {
        match self {
            Poster::Madagascar => Poster::Nemo,
            Poster::Nemo => Poster::Shrek,
            Poster::Shrek => Poster::Madagascar,
        }
    }

    /// Returns the display title (also the asset name).
    pub fn as_label(self) -> &'static str {
        match self {
            Poster::Madagascar => "madagascar",
            Poster::Nemo => "nemo",
            Poster::Shrek => "shrek",
        }
    }

    pub(crate) fn from_repr(v: u8) -> Self {
        match v % 3 {
            0 => Poster::Madagascar,
            1 => Poster::Nemo,
            _ => Poster::Shrek,
        }
    }
}

impl fmt::Display for Poster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successor_closes_after_three_steps() {
        for p in Poster::ALL {
            assert_eq!(p.next().next().next(), p, "cycle broken at {p}");
            assert_ne!(p.next(), p);
        }
    }

    #[test]
    fn test_successor_follows_all_order() {
        for (i, p) in Poster::ALL.iter().enumerate() {
            assert_eq!(p.next(), Poster::ALL[(i + 1) % Poster::ALL.len()]);
        }
    }

    #[test]
    fn test_repr_roundtrip() {
        for p in Poster::ALL {
            assert_eq!(Poster::from_repr(p as u8), p);
        }
    }
}
