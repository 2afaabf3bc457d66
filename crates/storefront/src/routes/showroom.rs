//! Showroom collection.
//!
//! The showroom is a fixed, curated set of pieces. It is not backed by the
//! product inventory.

/// A showroom card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowroomPiece {
    pub name: &'static str,
    pub category: &'static str,
    pub price: &'static str,
    pub image: &'static str,
}

/// Curated pieces, in display order.
pub static COLLECTION: [ShowroomPiece; 4] = [
    ShowroomPiece {
        name: "Midnight Bloom",
        category: "Necklace",
        price: "$2,450",
        image: "/static/images/jewelry-necklace.svg",
    },
    ShowroomPiece {
        name: "Aurora Ring",
        category: "Ring",
        price: "$1,890",
        image: "/static/images/jewelry-ring.svg",
    },
    ShowroomPiece {
        name: "Celestial Drops",
        category: "Earrings",
        price: "$1,650",
        image: "/static/images/jewelry-earrings.svg",
    },
    ShowroomPiece {
        name: "Eternal Grace",
        category: "Bracelet",
        price: "$2,100",
        image: "/static/images/jewelry-bracelet.svg",
    },
];
