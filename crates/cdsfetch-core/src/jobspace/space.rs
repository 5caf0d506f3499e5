//! The job space itself: count and index-to-descriptor decoding.

use std::fmt;

use super::{group_years, JobSpaceError};

/// Whether a variable needs a vertical-level selection when retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelTag {
    SingleLevel,
    MultiLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TaggedVariable {
    name: String,
    tag: LevelTag,
}

/// One decoded job: the years it covers, the variable to retrieve, and the
/// pressure levels to select. `levels` is `None` for single-level variables,
/// not an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    pub years: Vec<String>,
    pub variable: String,
    pub levels: Option<Vec<String>>,
}

impl fmt::Display for JobDescriptor {
    /// One job per line: `<space-joined years>,<variable>,<space-joined levels or empty>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.years.join(" "),
            self.variable,
            self.levels.as_deref().unwrap_or(&[]).join(" ")
        )
    }
}

/// A deterministic enumeration of (year-group × variable) download jobs.
///
/// The concatenated variable list is single-level variables followed by
/// multi-level ones; each entry carries its level tag so decoding never
/// re-checks catalog membership. Year-groups are the fast-varying axis:
/// consecutive indices exhaust all groups for one variable before moving to
/// the next variable. Batch arrays already submitted against this ordering
/// must keep decoding to the same jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpace {
    year_groups: Vec<Vec<String>>,
    variables: Vec<TaggedVariable>,
    levels: Vec<String>,
}

impl JobSpace {
    /// Builds a job space with `group_size` years per job.
    ///
    /// `levels` applies verbatim to every multi-level job. Fails when
    /// `group_size` is zero or a variable appears in both catalogs.
    pub fn new(
        years: &[String],
        group_size: usize,
        single_variables: &[String],
        multi_variables: &[String],
        levels: &[String],
    ) -> Result<Self, JobSpaceError> {
        let year_groups = group_years(years, group_size)?;

        for name in single_variables {
            if multi_variables.contains(name) {
                return Err(JobSpaceError::DuplicateVariable(name.clone()));
            }
        }

        let variables = single_variables
            .iter()
            .map(|name| TaggedVariable {
                name: name.clone(),
                tag: LevelTag::SingleLevel,
            })
            .chain(multi_variables.iter().map(|name| TaggedVariable {
                name: name.clone(),
                tag: LevelTag::MultiLevel,
            }))
            .collect();

        Ok(Self {
            year_groups,
            variables,
            levels: levels.to_vec(),
        })
    }

    /// Convenience for the one-year-per-job sizing.
    pub fn singleton_years(
        years: &[String],
        single_variables: &[String],
        multi_variables: &[String],
        levels: &[String],
    ) -> Result<Self, JobSpaceError> {
        Self::new(years, 1, single_variables, multi_variables, levels)
    }

    /// Number of year-groups (the fast-varying axis length).
    pub fn year_group_len(&self) -> usize {
        self.year_groups.len()
    }

    /// Total number of jobs. Callers size the batch array from this before
    /// submitting it.
    pub fn count(&self) -> usize {
        self.year_groups.len() * self.variables.len()
    }

    /// Decodes a zero-based linear index into its job descriptor.
    ///
    /// Row-major with year-groups as the inner dimension:
    /// `group = index % n_groups`, `variable = index / n_groups`.
    pub fn decode(&self, index: usize) -> Result<JobDescriptor, JobSpaceError> {
        let count = self.count();
        if index >= count {
            return Err(JobSpaceError::IndexOutOfRange { index, count });
        }

        let n_groups = self.year_groups.len();
        let group_position = index % n_groups;
        let variable_position = index / n_groups;

        let variable = &self.variables[variable_position];
        let levels = match variable.tag {
            LevelTag::SingleLevel => None,
            LevelTag::MultiLevel => Some(self.levels.clone()),
        };

        Ok(JobDescriptor {
            years: self.year_groups[group_position].clone(),
            variable: variable.name.clone(),
            levels,
        })
    }
}
