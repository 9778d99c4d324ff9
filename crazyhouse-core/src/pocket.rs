use serde::Serialize;

use crate::piece::PieceKind;

/// Captured pieces held in reserve by one side.
///
/// Kinds are kept in capture order. Order carries no rule meaning; it only
/// decides the order in which grouped counts are displayed.
#[derive(Clone, PartialEq, Eq, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct Pocket {
    pieces: Vec<PieceKind>,
}

impl Pocket {
    pub fn new() -> Pocket {
        Pocket { pieces: Vec::new() }
    }

    /// Add a captured kind. Kings never enter a pocket; returns false for them.
    pub fn add(&mut self, kind: PieceKind) -> bool {
        if kind == PieceKind::King {
            return false;
        }
        self.pieces.push(kind);
        true
    }

    /// Remove one entry of `kind`. Returns false if none is held.
    pub fn take(&mut self, kind: PieceKind) -> bool {
        match self.pieces.iter().position(|&k| k == kind) {
            Some(idx) => {
                self.pieces.remove(idx);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn contains(&self, kind: PieceKind) -> bool {
        self.pieces.contains(&kind)
    }

    pub fn count(&self, kind: PieceKind) -> usize {
        self.pieces.iter().filter(|&&k| k == kind).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Kinds in capture order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.pieces.iter().copied()
    }

    /// Distinct kinds with their counts, in first-captured order.
    pub fn counts(&self) -> Vec<(PieceKind, usize)> {
        let mut grouped: Vec<(PieceKind, usize)> = Vec::with_capacity(5);
        for kind in self.iter() {
            match grouped.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, n)) => *n += 1,
                None => grouped.push((kind, 1)),
            }
        }
        grouped
    }
}

impl std::fmt::Display for Pocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (kind, n)) in self.counts().into_iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", kind.letter())?;
            if n > 1 {
                write!(f, "{}", n)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_count() {
        let mut pocket = Pocket::new();
        assert!(pocket.is_empty());
        assert!(pocket.add(PieceKind::Knight));
        assert!(pocket.add(PieceKind::Pawn));
        assert!(pocket.add(PieceKind::Knight));
        assert_eq!(pocket.len(), 3);
        assert_eq!(pocket.count(PieceKind::Knight), 2);
        assert_eq!(pocket.count(PieceKind::Pawn), 1);
        assert_eq!(pocket.count(PieceKind::Queen), 0);
    }

    #[test]
    fn test_king_rejected() {
        let mut pocket = Pocket::new();
        assert!(!pocket.add(PieceKind::King));
        assert!(pocket.is_empty());
    }

    #[test]
    fn test_take_removes_one() {
        let mut pocket = Pocket::new();
        pocket.add(PieceKind::Rook);
        pocket.add(PieceKind::Rook);
        assert!(pocket.take(PieceKind::Rook));
        assert_eq!(pocket.count(PieceKind::Rook), 1);
        assert!(pocket.take(PieceKind::Rook));
        assert!(!pocket.take(PieceKind::Rook));
        assert!(pocket.is_empty());
    }

    #[test]
    fn test_counts_first_seen_order() {
        let mut pocket = Pocket::new();
        pocket.add(PieceKind::Bishop);
        pocket.add(PieceKind::Pawn);
        pocket.add(PieceKind::Bishop);
        pocket.add(PieceKind::Queen);
        pocket.add(PieceKind::Pawn);
        assert_eq!(
            pocket.counts(),
            vec![
                (PieceKind::Bishop, 2),
                (PieceKind::Pawn, 2),
                (PieceKind::Queen, 1),
            ]
        );
        assert_eq!(pocket.to_string(), "B2 P2 Q");
    }
}
