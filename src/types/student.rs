//! Student record types for the fee ledger
//!
//! This module defines the academic year and fee component enums, the
//! per-year fee breakdown, and the student record itself.

use super::error::LedgerError;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Number of academic years tracked per student
pub const YEAR_COUNT: usize = 4;

/// Number of chargeable fee components per year
pub const COMPONENT_COUNT: usize = 9;

/// Academic year of study (1st to 4th)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AcademicYear {
    First,
    Second,
    Third,
    Fourth,
}

impl AcademicYear {
    /// All years in order
    pub const ALL: [AcademicYear; YEAR_COUNT] = [
        AcademicYear::First,
        AcademicYear::Second,
        AcademicYear::Third,
        AcademicYear::Fourth,
    ];

    /// Zero-based position, used to index per-year arrays
    pub fn index(self) -> usize {
        self as usize
    }

    /// Ordinal label used in column names ("1st", "2nd", ...)
    pub fn ordinal(self) -> &'static str {
        match self {
            AcademicYear::First => "1st",
            AcademicYear::Second => "2nd",
            AcademicYear::Third => "3rd",
            AcademicYear::Fourth => "4th",
        }
    }

    /// Roman label printed on receipts ("I Year", "II Year", ...)
    pub fn roman_label(self) -> &'static str {
        match self {
            AcademicYear::First => "I Year",
            AcademicYear::Second => "II Year",
            AcademicYear::Third => "III Year",
            AcademicYear::Fourth => "IV Year",
        }
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} year", self.ordinal())
    }
}

impl FromStr for AcademicYear {
    type Err = LedgerError;

    /// Accepts "1", "1st", "1st year", "I", "I Year", "first" (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let head = normalized
            .strip_suffix("year")
            .unwrap_or(&normalized)
            .trim();

        match head {
            "1" | "1st" | "i" | "first" => Ok(AcademicYear::First),
            "2" | "2nd" | "ii" | "second" => Ok(AcademicYear::Second),
            "3" | "3rd" | "iii" | "third" => Ok(AcademicYear::Third),
            "4" | "4th" | "iv" | "fourth" => Ok(AcademicYear::Fourth),
            _ => Err(LedgerError::invalid_year(s)),
        }
    }
}

/// A chargeable fee category, tracked per academic year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeeComponent {
    Bus,
    Mess,
    Hostel,
    Exam,
    Tuition,
    Fine,
    Miscellaneous,
    Course,
    Due,
}

impl FeeComponent {
    /// All components in column order
    pub const ALL: [FeeComponent; COMPONENT_COUNT] = [
        FeeComponent::Bus,
        FeeComponent::Mess,
        FeeComponent::Hostel,
        FeeComponent::Exam,
        FeeComponent::Tuition,
        FeeComponent::Fine,
        FeeComponent::Miscellaneous,
        FeeComponent::Course,
        FeeComponent::Due,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name, which is also the column prefix in the ledger file.
    ///
    /// "Tution Fees" keeps the spelling of the existing spreadsheets.
    pub fn label(self) -> &'static str {
        match self {
            FeeComponent::Bus => "Bus Fees",
            FeeComponent::Mess => "Mess Fees",
            FeeComponent::Hostel => "Hostel Fees",
            FeeComponent::Exam => "Exam Fees",
            FeeComponent::Tuition => "Tution Fees",
            FeeComponent::Fine => "Fine",
            FeeComponent::Miscellaneous => "Miscellaneous",
            FeeComponent::Course => "Course Fees",
            FeeComponent::Due => "Due Fees",
        }
    }
}

impl fmt::Display for FeeComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FeeComponent {
    type Err = String;

    /// Accepts the column label ("Bus Fees") or a short name ("bus", "tuition")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let short = normalized.strip_suffix(" fees").unwrap_or(&normalized);

        match short {
            "bus" => Ok(FeeComponent::Bus),
            "mess" => Ok(FeeComponent::Mess),
            "hostel" => Ok(FeeComponent::Hostel),
            "exam" => Ok(FeeComponent::Exam),
            "tuition" | "tution" => Ok(FeeComponent::Tuition),
            "fine" => Ok(FeeComponent::Fine),
            "miscellaneous" | "misc" => Ok(FeeComponent::Miscellaneous),
            "course" => Ok(FeeComponent::Course),
            "due" => Ok(FeeComponent::Due),
            _ => Err(format!("unknown fee component '{}'", s)),
        }
    }
}

/// Fee breakdown for one academic year
///
/// `total` is the sum of the components at creation time and is not
/// recomputed afterwards. `paid` and `remaining` are maintained by payments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearFees {
    /// Component amounts, indexed by [`FeeComponent::index`]
    pub components: [Decimal; COMPONENT_COUNT],
    pub paid: Decimal,
    pub remaining: Decimal,
    pub total: Decimal,
}

impl YearFees {
    pub fn component(&self, component: FeeComponent) -> Decimal {
        self.components[component.index()]
    }

    pub fn set_component(&mut self, component: FeeComponent, amount: Decimal) {
        self.components[component.index()] = amount;
    }

    /// Sum of the nine components (paid/remaining/total excluded)
    ///
    /// Returns `None` on overflow.
    pub fn component_sum(&self) -> Option<Decimal> {
        self.components
            .iter()
            .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(*amount))
    }

    /// True when the year carries no amounts at all
    pub fn is_blank(&self) -> bool {
        self.components.iter().all(Decimal::is_zero)
            && self.paid.is_zero()
            && self.remaining.is_zero()
            && self.total.is_zero()
    }
}

/// Identity and demographic fields of a student
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentProfile {
    pub umis_number: String,
    pub emis_number: String,
    pub register_number: String,
    pub batch: String,
    pub name: String,
    pub sex: String,
    pub department: String,
    /// Stored as entered, normally `DD-MM-YYYY`
    pub date_of_birth: String,
    pub community: String,
    pub nationality_religion: String,
    pub father_name: String,
    pub address: String,
    pub mobile_number: String,
    pub aadhar_number: String,
    /// Stored text ("Yes"/"No"), see [`StudentProfile::is_first_graduate`]
    pub first_graduate: String,
}

impl StudentProfile {
    pub fn is_first_graduate(&self) -> bool {
        matches!(
            self.first_graduate.trim().to_lowercase().as_str(),
            "yes" | "y" | "true" | "1"
        )
    }

    /// Value of a profile field
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::UmisNumber => &self.umis_number,
            ProfileField::EmisNumber => &self.emis_number,
            ProfileField::RegisterNumber => &self.register_number,
            ProfileField::Batch => &self.batch,
            ProfileField::Name => &self.name,
            ProfileField::Sex => &self.sex,
            ProfileField::Department => &self.department,
            ProfileField::DateOfBirth => &self.date_of_birth,
            ProfileField::Community => &self.community,
            ProfileField::NationalityReligion => &self.nationality_religion,
            ProfileField::FatherName => &self.father_name,
            ProfileField::Address => &self.address,
            ProfileField::MobileNumber => &self.mobile_number,
            ProfileField::AadharNumber => &self.aadhar_number,
            ProfileField::FirstGraduate => &self.first_graduate,
        }
    }

    pub fn set(&mut self, field: ProfileField, value: String) {
        let slot = match field {
            ProfileField::UmisNumber => &mut self.umis_number,
            ProfileField::EmisNumber => &mut self.emis_number,
            ProfileField::RegisterNumber => &mut self.register_number,
            ProfileField::Batch => &mut self.batch,
            ProfileField::Name => &mut self.name,
            ProfileField::Sex => &mut self.sex,
            ProfileField::Department => &mut self.department,
            ProfileField::DateOfBirth => &mut self.date_of_birth,
            ProfileField::Community => &mut self.community,
            ProfileField::NationalityReligion => &mut self.nationality_religion,
            ProfileField::FatherName => &mut self.father_name,
            ProfileField::Address => &mut self.address,
            ProfileField::MobileNumber => &mut self.mobile_number,
            ProfileField::AadharNumber => &mut self.aadhar_number,
            ProfileField::FirstGraduate => &mut self.first_graduate,
        };
        *slot = value;
    }
}

/// Text fields of a student record, in ledger column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    UmisNumber,
    EmisNumber,
    RegisterNumber,
    Batch,
    Name,
    Sex,
    Department,
    DateOfBirth,
    Community,
    NationalityReligion,
    FatherName,
    Address,
    MobileNumber,
    AadharNumber,
    FirstGraduate,
}

impl ProfileField {
    pub const ALL: [ProfileField; 15] = [
        ProfileField::UmisNumber,
        ProfileField::EmisNumber,
        ProfileField::RegisterNumber,
        ProfileField::Batch,
        ProfileField::Name,
        ProfileField::Sex,
        ProfileField::Department,
        ProfileField::DateOfBirth,
        ProfileField::Community,
        ProfileField::NationalityReligion,
        ProfileField::FatherName,
        ProfileField::Address,
        ProfileField::MobileNumber,
        ProfileField::AadharNumber,
        ProfileField::FirstGraduate,
    ];

    /// Column header in the ledger file
    pub fn column(self) -> &'static str {
        match self {
            ProfileField::UmisNumber => "UMIS Number",
            ProfileField::EmisNumber => "EMIS Number",
            ProfileField::RegisterNumber => "Register Number",
            ProfileField::Batch => "Batch",
            ProfileField::Name => "Name",
            ProfileField::Sex => "Sex",
            ProfileField::Department => "Department",
            ProfileField::DateOfBirth => "Date of Birth",
            ProfileField::Community => "Community & Subcaste",
            ProfileField::NationalityReligion => "Nationality & Religion",
            ProfileField::FatherName => "Father's Name",
            ProfileField::Address => "Address",
            ProfileField::MobileNumber => "Mobile Number",
            ProfileField::AadharNumber => "Aadhar Number",
            ProfileField::FirstGraduate => "First Graduate",
        }
    }

    /// Short command-line name ("register-number", "department", ...)
    pub fn key(self) -> &'static str {
        match self {
            ProfileField::UmisNumber => "umis-number",
            ProfileField::EmisNumber => "emis-number",
            ProfileField::RegisterNumber => "register-number",
            ProfileField::Batch => "batch",
            ProfileField::Name => "name",
            ProfileField::Sex => "sex",
            ProfileField::Department => "department",
            ProfileField::DateOfBirth => "date-of-birth",
            ProfileField::Community => "community",
            ProfileField::NationalityReligion => "nationality-religion",
            ProfileField::FatherName => "father-name",
            ProfileField::Address => "address",
            ProfileField::MobileNumber => "mobile-number",
            ProfileField::AadharNumber => "aadhar-number",
            ProfileField::FirstGraduate => "first-graduate",
        }
    }
}

impl FromStr for ProfileField {
    type Err = LedgerError;

    /// Accepts the short key or the column header (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ProfileField::ALL
            .into_iter()
            .find(|field| {
                field.key().eq_ignore_ascii_case(wanted)
                    || field.column().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| LedgerError::unknown_field(s))
    }
}

/// One row of the ledger
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentRecord {
    pub profile: StudentProfile,
    /// Per-year fees, indexed by [`AcademicYear::index`]
    pub years: [YearFees; YEAR_COUNT],
    /// Columns present in the ledger file that the ledger does not model,
    /// keyed by header
    pub extra: BTreeMap<String, String>,
}

impl StudentRecord {
    pub fn year(&self, year: AcademicYear) -> &YearFees {
        &self.years[year.index()]
    }

    pub fn year_mut(&mut self, year: AcademicYear) -> &mut YearFees {
        &mut self.years[year.index()]
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn register_number(&self) -> &str {
        &self.profile.register_number
    }
}

/// Fee input for one year of a new student
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearFeeInput {
    /// Component amounts, indexed by [`FeeComponent::index`]
    pub components: [Decimal; COMPONENT_COUNT],
    /// Amount already paid when the record is created
    pub paid: Decimal,
}

impl YearFeeInput {
    /// Builder-style helper for a single component
    pub fn with(mut self, component: FeeComponent, amount: Decimal) -> Self {
        self.components[component.index()] = amount;
        self
    }

    pub fn with_paid(mut self, paid: Decimal) -> Self {
        self.paid = paid;
        self
    }
}

/// Input of the add-student operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewStudent {
    pub profile: StudentProfile,
    pub fees: [YearFeeInput; YEAR_COUNT],
}

impl NewStudent {
    pub fn new(profile: StudentProfile) -> Self {
        NewStudent {
            profile,
            fees: Default::default(),
        }
    }

    pub fn with_year(mut self, year: AcademicYear, fees: YearFeeInput) -> Self {
        self.fees[year.index()] = fees;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::digit("1", AcademicYear::First)]
    #[case::ordinal("2nd", AcademicYear::Second)]
    #[case::ordinal_with_suffix("3rd year", AcademicYear::Third)]
    #[case::roman("IV", AcademicYear::Fourth)]
    #[case::roman_label("II Year", AcademicYear::Second)]
    #[case::word("First", AcademicYear::First)]
    #[case::padded("  4  ", AcademicYear::Fourth)]
    fn test_academic_year_parsing(#[case] input: &str, #[case] expected: AcademicYear) {
        assert_eq!(input.parse::<AcademicYear>().unwrap(), expected);
    }

    #[rstest]
    #[case::zero("0")]
    #[case::fifth("5th")]
    #[case::empty("")]
    fn test_academic_year_rejects_unknown(#[case] input: &str) {
        let err = input.parse::<AcademicYear>().unwrap_err();
        assert!(matches!(err, LedgerError::InvalidYear { .. }));
    }

    #[test]
    fn test_academic_year_labels() {
        assert_eq!(AcademicYear::Third.to_string(), "3rd year");
        assert_eq!(AcademicYear::Third.roman_label(), "III Year");
        assert_eq!(AcademicYear::Fourth.index(), 3);
    }

    #[rstest]
    #[case::short("tuition", FeeComponent::Tuition)]
    #[case::legacy_spelling("Tution Fees", FeeComponent::Tuition)]
    #[case::label("Bus Fees", FeeComponent::Bus)]
    #[case::misc("misc", FeeComponent::Miscellaneous)]
    fn test_fee_component_parsing(#[case] input: &str, #[case] expected: FeeComponent) {
        assert_eq!(input.parse::<FeeComponent>().unwrap(), expected);
    }

    #[test]
    fn test_component_sum_excludes_paid() {
        let mut fees = YearFees::default();
        fees.set_component(FeeComponent::Tuition, Decimal::from(1000));
        fees.set_component(FeeComponent::Exam, Decimal::from(250));
        fees.paid = Decimal::from(5000);

        assert_eq!(fees.component_sum(), Some(Decimal::from(1250)));
        assert_eq!(fees.component(FeeComponent::Exam), Decimal::from(250));
    }

    #[rstest]
    #[case::key("register-number", ProfileField::RegisterNumber)]
    #[case::column("Register Number", ProfileField::RegisterNumber)]
    #[case::column_any_case("department", ProfileField::Department)]
    #[case::apostrophe("Father's Name", ProfileField::FatherName)]
    fn test_profile_field_parsing(#[case] input: &str, #[case] expected: ProfileField) {
        assert_eq!(input.parse::<ProfileField>().unwrap(), expected);
    }

    #[test]
    fn test_profile_field_unknown() {
        let err = "shoe size".parse::<ProfileField>().unwrap_err();
        assert_eq!(err, LedgerError::unknown_field("shoe size"));
    }

    #[test]
    fn test_profile_get_set_round_trip() {
        let mut profile = StudentProfile::default();
        for field in ProfileField::ALL {
            profile.set(field, field.key().to_string());
        }
        for field in ProfileField::ALL {
            assert_eq!(profile.get(field), field.key());
        }
    }

    #[rstest]
    #[case("Yes", true)]
    #[case("yes ", true)]
    #[case("No", false)]
    #[case("", false)]
    fn test_first_graduate_flag(#[case] stored: &str, #[case] expected: bool) {
        let profile = StudentProfile {
            first_graduate: stored.to_string(),
            ..Default::default()
        };
        assert_eq!(profile.is_first_graduate(), expected);
    }
}
