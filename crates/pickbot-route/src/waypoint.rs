//! Pick targets and the lookup from product names to shelf cells.

use pickbot_core::Point;

/// A shelf cell the robot must visit before heading to the packing station.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub pos: Point,
    /// Opaque caller label, shown in "Picking up ⟨label⟩".
    pub label: String,
    /// Demand score used by priority ordering; higher goes first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: Option<f64>,
}

impl Waypoint {
    pub fn new(pos: Point, label: impl Into<String>) -> Self {
        Self {
            pos,
            label: label.into(),
            priority: None,
        }
    }

    /// Set the priority weight (builder).
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Priority weight, with a missing weight counting as zero.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.priority.unwrap_or(0.0)
    }
}

/// An order line that still has to be matched to a shelf.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderItem {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: Option<f64>,
}

impl OrderItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: None,
        }
    }
}

/// Products stocked on shelf cells, in the order they were assigned.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShelfMap {
    entries: Vec<(Point, String)>,
}

impl ShelfMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `product` to the shelf at `pos`, replacing what was there.
    pub fn insert(&mut self, pos: Point, product: impl Into<String>) {
        let product = product.into();
        match self.entries.iter_mut().find(|(p, _)| *p == pos) {
            Some(entry) => entry.1 = product,
            None => self.entries.push((pos, product)),
        }
    }

    /// Clear the shelf at `pos`.
    pub fn remove(&mut self, pos: Point) {
        self.entries.retain(|(p, _)| *p != pos);
    }

    /// First shelf stocking `product`, compared case-insensitively.
    pub fn lookup(&self, product: &str) -> Option<Point> {
        let wanted = product.to_lowercase();
        self.entries
            .iter()
            .find(|(_, name)| name.to_lowercase() == wanted)
            .map(|(p, _)| *p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Point, &str)> {
        self.entries.iter().map(|(p, n)| (*p, n.as_str()))
    }
}

/// Outcome of [`resolve_items`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub waypoints: Vec<Waypoint>,
    /// Names of items no shelf stocks.
    pub unresolved: Vec<String>,
}

/// Attach shelf positions to order items by product name.
///
/// Items keep their input order. Items with no matching shelf are left out
/// of the waypoints and reported in [`Resolution::unresolved`].
pub fn resolve_items(items: &[OrderItem], shelves: &ShelfMap) -> Resolution {
    let mut out = Resolution::default();
    for item in items {
        match shelves.lookup(&item.name) {
            Some(pos) => out.waypoints.push(Waypoint {
                pos,
                label: item.name.clone(),
                priority: item.priority,
            }),
            None => {
                log::warn!("no shelf location found for item \"{}\"", item.name);
                out.unresolved.push(item.name.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shelves() -> ShelfMap {
        let mut m = ShelfMap::new();
        m.insert(Point::new(1, 1), "Milk");
        m.insert(Point::new(3, 1), "Bread");
        m.insert(Point::new(3, 3), "milk");
        m
    }

    #[test]
    fn lookup_is_case_insensitive_and_first_wins() {
        let m = shelves();
        assert_eq!(m.lookup("MILK"), Some(Point::new(1, 1)));
        assert_eq!(m.lookup("bread"), Some(Point::new(3, 1)));
        assert_eq!(m.lookup("eggs"), None);
    }

    #[test]
    fn insert_replaces_and_remove_clears() {
        let mut m = shelves();
        m.insert(Point::new(1, 1), "Eggs");
        assert_eq!(m.len(), 3);
        assert_eq!(m.lookup("eggs"), Some(Point::new(1, 1)));
        assert_eq!(m.lookup("milk"), Some(Point::new(3, 3)));
        m.remove(Point::new(3, 3));
        assert_eq!(m.lookup("milk"), None);
    }

    #[test]
    fn resolve_keeps_order_and_reports_missing() {
        let items = vec![
            OrderItem::new("bread"),
            OrderItem {
                name: "Milk".into(),
                priority: Some(3.0),
            },
            OrderItem::new("eggs"),
        ];
        let r = resolve_items(&items, &shelves());
        assert_eq!(
            r.waypoints,
            vec![
                Waypoint::new(Point::new(3, 1), "bread"),
                Waypoint::new(Point::new(1, 1), "Milk").with_priority(3.0),
            ]
        );
        assert_eq!(r.unresolved, vec!["eggs".to_string()]);
    }
}
