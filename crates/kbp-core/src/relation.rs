//! KBP relation catalog
//!
//! The catalog is a flat, ordered table of relation descriptors. Its order is
//! the classifier's tie-break priority: when several relations could match the
//! same input, the one listed first wins.

use serde::{Deserialize, Serialize};

// ============================================================================
// NER Tags
// ============================================================================

/// Entity types that can fill a KBP relation argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NerTag {
    CauseOfDeath,
    City,
    Country,
    CriminalCharge,
    Date,
    Duration,
    Ideology,
    Location,
    Misc,
    Modifier,
    Nationality,
    Number,
    Organization,
    Person,
    Religion,
    StateOrProvince,
    Title,
    Url,
}

impl NerTag {
    /// Every tag, in declaration order
    pub const ALL: [NerTag; 18] = [
        Self::CauseOfDeath,
        Self::City,
        Self::Country,
        Self::CriminalCharge,
        Self::Date,
        Self::Duration,
        Self::Ideology,
        Self::Location,
        Self::Misc,
        Self::Modifier,
        Self::Nationality,
        Self::Number,
        Self::Organization,
        Self::Person,
        Self::Religion,
        Self::StateOrProvince,
        Self::Title,
        Self::Url,
    ];

    /// The label written into token NER slots
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CauseOfDeath => "CAUSE_OF_DEATH",
            Self::City => "CITY",
            Self::Country => "COUNTRY",
            Self::CriminalCharge => "CRIMINAL_CHARGE",
            Self::Date => "DATE",
            Self::Duration => "DURATION",
            Self::Ideology => "IDEOLOGY",
            Self::Location => "LOCATION",
            Self::Misc => "MISC",
            Self::Modifier => "MODIFIER",
            Self::Nationality => "NATIONALITY",
            Self::Number => "NUMBER",
            Self::Organization => "ORGANIZATION",
            Self::Person => "PERSON",
            Self::Religion => "RELIGION",
            Self::StateOrProvince => "STATE_OR_PROVINCE",
            Self::Title => "TITLE",
            Self::Url => "URL",
        }
    }
}

impl std::fmt::Display for NerTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NerTag {
    type Err = crate::KbpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == upper)
            .ok_or_else(|| crate::KbpError::UnknownNerTag(s.to_string()))
    }
}

// ============================================================================
// Relation Types
// ============================================================================

/// A relation type with its argument type constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationType {
    canonical_name: &'static str,
    subject_type: NerTag,
    object_types: &'static [NerTag],
}

impl RelationType {
    /// Declare a relation type
    pub const fn new(
        canonical_name: &'static str,
        subject_type: NerTag,
        object_types: &'static [NerTag],
    ) -> Self {
        Self {
            canonical_name,
            subject_type,
            object_types,
        }
    }

    /// The full KBP catalog in priority order
    pub fn all() -> &'static [RelationType] {
        KBP_RELATIONS
    }

    /// Look up a catalog entry by its canonical name
    pub fn from_canonical_name(name: &str) -> Option<Self> {
        KBP_RELATIONS
            .iter()
            .copied()
            .find(|r| r.canonical_name == name)
    }

    /// Stable name, used both as output label and as rule file key
    pub fn canonical_name(&self) -> &'static str {
        self.canonical_name
    }

    /// The entity type the subject must have
    pub fn subject_type(&self) -> NerTag {
        self.subject_type
    }

    /// Entity types accepted for the object
    pub fn valid_object_types(&self) -> &'static [NerTag] {
        self.object_types
    }

    /// Whether `tag` may fill the object slot
    pub fn accepts_object(&self, tag: NerTag) -> bool {
        self.object_types.contains(&tag)
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_name)
    }
}

use NerTag::*;

const LOCATIONS: &[NerTag] = &[City, StateOrProvince, Country, Location];

static KBP_RELATIONS: &[RelationType] = &[
    // Person relations
    RelationType::new("per:alternate_names", Person, &[Person, Misc]),
    RelationType::new("per:children", Person, &[Person]),
    RelationType::new("per:cities_of_residence", Person, &[City]),
    RelationType::new("per:city_of_birth", Person, &[City]),
    RelationType::new("per:city_of_death", Person, &[City]),
    RelationType::new("per:countries_of_residence", Person, &[Country]),
    RelationType::new("per:country_of_birth", Person, &[Country]),
    RelationType::new("per:country_of_death", Person, &[Country]),
    RelationType::new("per:employee_of", Person, &[Organization]),
    RelationType::new("per:loc_of_birth", Person, LOCATIONS),
    RelationType::new("per:loc_of_death", Person, LOCATIONS),
    RelationType::new("per:loc_of_residence", Person, LOCATIONS),
    RelationType::new("per:member_of", Person, &[Organization]),
    RelationType::new("per:origin", Person, &[Nationality, Country]),
    RelationType::new("per:other_family", Person, &[Person]),
    RelationType::new("per:parents", Person, &[Person]),
    RelationType::new("per:schools_attended", Person, &[Organization]),
    RelationType::new("per:siblings", Person, &[Person]),
    RelationType::new("per:spouse", Person, &[Person]),
    RelationType::new("per:stateorprovince_of_birth", Person, &[StateOrProvince]),
    RelationType::new("per:stateorprovince_of_death", Person, &[StateOrProvince]),
    RelationType::new(
        "per:stateorprovinces_of_residence",
        Person,
        &[StateOrProvince],
    ),
    RelationType::new("per:age", Person, &[Number, Duration]),
    RelationType::new("per:date_of_birth", Person, &[Date]),
    RelationType::new("per:date_of_death", Person, &[Date]),
    RelationType::new("per:cause_of_death", Person, &[CauseOfDeath]),
    RelationType::new("per:charges", Person, &[CriminalCharge]),
    RelationType::new("per:religion", Person, &[Religion]),
    RelationType::new("per:title", Person, &[Title, Modifier]),
    // Organization relations
    RelationType::new("org:alternate_names", Organization, &[Organization, Misc]),
    RelationType::new("org:city_of_headquarters", Organization, &[City, Location]),
    RelationType::new(
        "org:country_of_headquarters",
        Organization,
        &[Country, Nationality],
    ),
    RelationType::new("org:founded_by", Organization, &[Person, Organization]),
    RelationType::new("org:loc_of_headquarters", Organization, LOCATIONS),
    RelationType::new(
        "org:member_of",
        Organization,
        &[Organization, Country, Location, StateOrProvince],
    ),
    RelationType::new("org:members", Organization, &[Organization, Country]),
    RelationType::new("org:parents", Organization, &[Organization, Country]),
    RelationType::new(
        "org:political/religious_affiliation",
        Organization,
        &[Ideology, Religion],
    ),
    RelationType::new("org:shareholders", Organization, &[Person, Organization]),
    RelationType::new(
        "org:stateorprovince_of_headquarters",
        Organization,
        &[StateOrProvince],
    ),
    RelationType::new("org:subsidiaries", Organization, &[Organization]),
    RelationType::new("org:top_members/employees", Organization, &[Person]),
    RelationType::new("org:dissolved", Organization, &[Date]),
    RelationType::new("org:founded", Organization, &[Date]),
    RelationType::new("org:number_of_employees/members", Organization, &[Number]),
    RelationType::new("org:website", Organization, &[Url]),
];

// ============================================================================
// Tests
// ============================================================================
