use std::fmt;

use itertools::Itertools;

use crate::csp::model::{Model, VarId};
use crate::csp::solver::{Assignment, Outcome, SolveError, solve};

const PALETTE: [&str; 6] = ["red", "green", "blue", "yellow", "purple", "orange"];

/// Human-readable name for a color index. Indices beyond the palette fall
/// back to `colorN`.
#[must_use]
pub fn color_name(index: i32) -> String {
    usize::try_from(index)
        .ok()
        .and_then(|i| PALETTE.get(i))
        .map_or_else(|| format!("color{index}"), |name| (*name).to_string())
}

const AUSTRALIA_REGIONS: [&str; 7] = ["WA", "NT", "SA", "Q", "NSW", "V", "T"];

const AUSTRALIA_BORDERS: [(&str, &str); 9] = [
    ("WA", "NT"),
    ("WA", "SA"),
    ("NT", "SA"),
    ("NT", "Q"),
    ("SA", "Q"),
    ("SA", "NSW"),
    ("SA", "V"),
    ("Q", "NSW"),
    ("NSW", "V"),
];

/// A map-coloring instance: named regions, the borders between them, and the
/// number of colors on offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapColoring {
    colors: i32,
    regions: Vec<String>,
    borders: Vec<(usize, usize)>,
}

impl MapColoring {
    /// Creates an empty map with `colors` colors available.
    ///
    /// # Panics
    ///
    /// If `colors` is less than one.
    #[must_use]
    pub fn new(colors: i32) -> Self {
        assert!(colors >= 1, "a map needs at least one color, got {colors}");
        Self {
            colors,
            regions: Vec::new(),
            borders: Vec::new(),
        }
    }

    /// The mainland states and Tasmania, with every land border. Tasmania
    /// borders nothing, and the SA/NT/Q triangle is what pushes the
    /// chromatic number to three.
    #[must_use]
    pub fn australia(colors: i32) -> Self {
        let mut map = Self::new(colors);
        for region in AUSTRALIA_REGIONS {
            map.add_region(region);
        }
        for (a, b) in AUSTRALIA_BORDERS {
            map.add_border(a, b);
        }
        map
    }

    /// Declares a region.
    ///
    /// # Panics
    ///
    /// If a region of the same name already exists.
    pub fn add_region(&mut self, name: impl Into<String>) {
        let name = name.into();
        assert!(
            !self.regions.contains(&name),
            "region {name} declared twice"
        );
        self.regions.push(name);
    }

    /// Declares a border between two distinct, previously declared regions.
    ///
    /// # Panics
    ///
    /// If either name is unknown, or if `a` and `b` are the same region.
    pub fn add_border(&mut self, a: &str, b: &str) {
        assert_ne!(a, b, "region {a} cannot border itself");
        let a = self.region_index(a);
        let b = self.region_index(b);
        self.borders.push((a, b));
    }

    /// Region names in declaration order.
    #[must_use]
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Borders as name pairs, in declaration order.
    pub fn borders(&self) -> impl Iterator<Item = (&str, &str)> {
        self.borders
            .iter()
            .map(|&(a, b)| (self.regions[a].as_str(), self.regions[b].as_str()))
    }

    /// Number of colors on offer.
    #[must_use]
    pub const fn num_colors(&self) -> i32 {
        self.colors
    }

    /// Builds the constraint model: one variable per region over the color
    /// indices, one disequality per border. The returned handles follow
    /// region declaration order.
    #[must_use]
    pub fn to_model(&self) -> (Model, Vec<VarId>) {
        let mut model = Model::new();
        let vars: Vec<VarId> = self
            .regions
            .iter()
            .map(|name| model.new_var(name.clone(), 0, self.colors - 1))
            .collect();
        for &(a, b) in &self.borders {
            model.not_equal(vars[a], vars[b]);
        }
        (model, vars)
    }

    /// Reads a satisfying assignment back into a region-to-color table.
    ///
    /// # Panics
    ///
    /// If the assignment belongs to a different model than the one built by
    /// [`to_model`](Self::to_model).
    #[must_use]
    pub fn decode_solution(&self, vars: &[VarId], assignment: &Assignment) -> Coloring {
        Coloring {
            assignments: self
                .regions
                .iter()
                .zip(vars)
                .map(|(name, &var)| (name.clone(), assignment.value(var)))
                .collect(),
        }
    }

    /// Solves the instance. `None` means the map cannot be colored with the
    /// colors on offer.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] when the external solver fails to reach a
    /// conclusion.
    pub fn solve(&self) -> Result<Option<Coloring>, SolveError> {
        let (model, vars) = self.to_model();
        match solve(&model)? {
            Outcome::Satisfiable(assignment) => {
                Ok(Some(self.decode_solution(&vars, &assignment)))
            }
            Outcome::Unsatisfiable => Ok(None),
        }
    }

    fn region_index(&self, name: &str) -> usize {
        self.regions
            .iter()
            .position(|r| r == name)
            .unwrap_or_else(|| panic!("no region named {name}"))
    }
}

/// A coloring of every region, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coloring {
    assignments: Vec<(String, i32)>,
}

impl Coloring {
    /// The color index assigned to `region`, if the region exists.
    #[must_use]
    pub fn color(&self, region: &str) -> Option<i32> {
        self.assignments
            .iter()
            .find(|(name, _)| name == region)
            .map(|&(_, color)| color)
    }

    /// Iterates over `(region, color index)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.assignments
            .iter()
            .map(|(name, color)| (name.as_str(), *color))
    }
}

impl fmt::Display for Coloring {
    /// Renders one `region: color` line per region.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self
            .iter()
            .map(|(region, color)| format!("{region}: {}", color_name(color)))
            .join("\n");
        write!(f, "{lines}")
    }
}
