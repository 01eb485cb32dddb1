//! The job application form served by this deployment.

use super::{Choice, Field, FieldKind, FieldRule, FormSchema, Section};

/// Field ids the submission adapters read by name.
pub mod ids {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const AGE: &str = "age";
    pub const ADDRESS: &str = "address";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const ZIP: &str = "zip";
    pub const SSN: &str = "ssn";
    pub const DL_FRONT: &str = "dlFront";
    pub const DL_BACK: &str = "dlBack";
    pub const POSITION: &str = "position";
    pub const EXPERIENCE: &str = "experience";
    pub const AVAILABILITY: &str = "availability";
    pub const RESUME: &str = "resume";
    pub const ADDITIONAL_INFO: &str = "additionalInfo";
    pub const TERMS: &str = "terms";
}

const US_STATES: &[Choice] = &[
    Choice::same("Alabama"),
    Choice::same("Alaska"),
    Choice::same("Arizona"),
    Choice::same("Arkansas"),
    Choice::same("California"),
    Choice::same("Colorado"),
    Choice::same("Connecticut"),
    Choice::same("Delaware"),
    Choice::same("Florida"),
    Choice::same("Georgia"),
    Choice::same("Hawaii"),
    Choice::same("Idaho"),
    Choice::same("Illinois"),
    Choice::same("Indiana"),
    Choice::same("Iowa"),
    Choice::same("Kansas"),
    Choice::same("Kentucky"),
    Choice::same("Louisiana"),
    Choice::same("Maine"),
    Choice::same("Maryland"),
    Choice::same("Massachusetts"),
    Choice::same("Michigan"),
    Choice::same("Minnesota"),
    Choice::same("Mississippi"),
    Choice::same("Missouri"),
    Choice::same("Montana"),
    Choice::same("Nebraska"),
    Choice::same("Nevada"),
    Choice::same("New Hampshire"),
    Choice::same("New Jersey"),
    Choice::same("New Mexico"),
    Choice::same("New York"),
    Choice::same("North Carolina"),
    Choice::same("North Dakota"),
    Choice::same("Ohio"),
    Choice::same("Oklahoma"),
    Choice::same("Oregon"),
    Choice::same("Pennsylvania"),
    Choice::same("Rhode Island"),
    Choice::same("South Carolina"),
    Choice::same("South Dakota"),
    Choice::same("Tennessee"),
    Choice::same("Texas"),
    Choice::same("Utah"),
    Choice::same("Vermont"),
    Choice::same("Virginia"),
    Choice::same("Washington"),
    Choice::same("West Virginia"),
    Choice::same("Wisconsin"),
    Choice::same("Wyoming"),
];

const POSITIONS: &[Choice] = &[
    Choice::new("Driver", "Driver"),
    Choice::new("Logistics", "Logistics Coordinator"),
    Choice::new("Warehouse", "Warehouse Associate"),
    Choice::new("Admin", "Administrative Assistant"),
    Choice::new("Manager", "Operations Manager"),
];

const EXPERIENCE_LEVELS: &[Choice] = &[
    Choice::new("<1", "Less than 1 year"),
    Choice::new("1-3", "1-3 years"),
    Choice::new("3-5", "3-5 years"),
    Choice::new("5-10", "5-10 years"),
    Choice::new("10+", "10+ years"),
];

const AVAILABILITY: &[Choice] = &[
    Choice::same("Full-time"),
    Choice::same("Part-time"),
    Choice::same("Contract"),
    Choice::same("Temporary"),
];

pub fn application_form() -> FormSchema {
    FormSchema {
        title: "AKG Consulting Job Application",
        description: "Join our team and be part of something great",
        submit_label: "Submit Application",
        sections: vec![personal_section(), position_section(), additional_section()],
    }
}

fn personal_section() -> Section {
    Section {
        title: "Personal Information",
        description: Some("Please provide your contact and personal details"),
        fields: vec![
            Field::new(ids::NAME, "Full Name", FieldKind::ShortText)
                .required()
                .placeholder("Enter your full name")
                .rule(FieldRule::PersonName),
            Field::new(ids::EMAIL, "Email Address", FieldKind::Email)
                .required()
                .placeholder("Enter your email address")
                .rule(FieldRule::Email),
            Field::new(ids::PHONE, "Phone Number", FieldKind::Phone)
                .required()
                .placeholder("Enter your phone number")
                .rule(FieldRule::Phone),
            Field::new(ids::AGE, "Age", FieldKind::Number)
                .required()
                .placeholder("Enter your age")
                .rule(FieldRule::Age),
            Field::new(ids::ADDRESS, "Address", FieldKind::ShortText)
                .required()
                .placeholder("Enter your street address")
                .rule(FieldRule::MinLength {
                    min: 5,
                    message: "Please enter a complete address",
                }),
            Field::new(ids::CITY, "City", FieldKind::ShortText)
                .required()
                .placeholder("Enter your city")
                .rule(FieldRule::MinLength {
                    min: 2,
                    message: "Please enter a valid city name",
                }),
            Field::new(ids::STATE, "State", FieldKind::Select)
                .required()
                .placeholder("Select your state")
                .options(US_STATES),
            Field::new(ids::ZIP, "ZIP Code", FieldKind::ShortText)
                .required()
                .placeholder("12345")
                .rule(FieldRule::PostalCode),
            Field::new(ids::SSN, "Social Security Number", FieldKind::ShortText)
                .required()
                .placeholder("XXX-XX-XXXX")
                .rule(FieldRule::IdentityNumber),
            Field::new(ids::DL_FRONT, "Driver's License - Front", FieldKind::File)
                .required()
                .accept("image/*"),
            Field::new(ids::DL_BACK, "Driver's License - Back", FieldKind::File)
                .required()
                .accept("image/*"),
        ],
    }
}

fn position_section() -> Section {
    Section {
        title: "Position Information",
        description: Some("Tell us about the position you're interested in"),
        fields: vec![
            Field::new(ids::POSITION, "Position", FieldKind::Select)
                .required()
                .placeholder("Select a position")
                .options(POSITIONS),
            Field::new(ids::EXPERIENCE, "Years of Experience", FieldKind::Select)
                .required()
                .placeholder("Select years of experience")
                .options(EXPERIENCE_LEVELS),
            Field::new(ids::AVAILABILITY, "Availability", FieldKind::Radio)
                .required()
                .options(AVAILABILITY),
        ],
    }
}

fn additional_section() -> Section {
    Section {
        title: "Additional Information",
        description: Some(
            "Please provide any additional information that might be relevant to your application",
        ),
        fields: vec![
            Field::new(ids::RESUME, "LinkedIn Profile or Portfolio URL", FieldKind::ShortText)
                .placeholder("https://")
                .rule(FieldRule::Url),
            Field::new(
                ids::ADDITIONAL_INFO,
                "Is there anything else you'd like us to know?",
                FieldKind::TextArea,
            )
            .placeholder("Additional information..."),
            Field::new(
                ids::TERMS,
                "I certify that the information provided is accurate and I agree to the terms",
                FieldKind::Checkbox,
            )
            .required(),
        ],
    }
}
