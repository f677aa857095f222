//! Representative municipal documents used by the demo command and the
//! `/api/v1/sample-documents` route.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `(file name, text)` pairs covering every priority bucket.
pub const SAMPLE_DOCUMENTS: &[(&str, &str)] = &[
    (
        "cannabis_retail_ordinance_approved.txt",
        r#"CITY COUNCIL MEETING MINUTES
Date: December 15, 2024
Location: City Hall Council Chambers

AGENDA ITEM 7.3: CANNABIS RETAIL ORDINANCE

The council discussed the proposed cannabis retail ordinance for the downtown district.
After extensive public hearing and planning commission review, the ordinance was approved
with a 5-2 vote. The licensing program will open on January 15, 2025, with an application
window of 30 days. Merit-based selection will be used for the initial 5 dispensary licenses.

Key provisions:
- Conditional use permit approved for cannabis retail in C-2 zones
- Social equity program included for local business owners
- Application period: January 15 - February 14, 2025
- Second reading scheduled for January 5, 2025

Motion passed. Ordinance effective immediately."#,
    ),
    (
        "planning_commission_hearing.txt",
        r#"PLANNING COMMISSION MEETING
Date: November 28, 2024

PUBLIC HEARING: DRAFT ORDINANCE - CANNABIS BUSINESS ZONING

The commission held a public hearing on proposed zoning amendments for cannabis business
operations. The draft ordinance would allow cannabis retail, cultivation, and processing
in designated industrial zones. Several community members spoke in favor of the economic
benefits, citing potential tax revenue increases.

Study session scheduled for December 10 to review public comments.
No action taken - item continued to next meeting."#,
    ),
    (
        "city_budget_discussion.txt",
        r#"ANNUAL BUDGET WORKSHOP
Date: October 20, 2024

BUDGET DISCUSSION: CANNABIS TAX REVENUE

The finance department presented projections for cannabis tax revenue in the upcoming
fiscal year. Based on current dispensary operations and proposed new licenses, the city
expects $2.3 million in cannabis-related tax revenue. This represents a 15% increase
from the previous year.

General mention was made of expanding cannabis business opportunities, but no specific
action items were proposed."#,
    ),
    (
        "moratorium_lifted.txt",
        r#"CITY COUNCIL SPECIAL MEETING
Date: January 10, 2025

EMERGENCY ITEM: CANNABIS MORATORIUM LIFTED

The council voted unanimously to lift the temporary moratorium on cannabis business
applications. The moratorium was originally enacted to allow time for comprehensive
ordinance development. With the new cannabis business regulations now in place, the
moratorium is no longer necessary.

Effective immediately, new cannabis business applications may be submitted."#,
    ),
    (
        "dispensary_license_application.txt",
        r#"DEPARTMENT OF LICENSING AND PERMITS
Date: February 1, 2025

NOTICE: DISPENSARY LICENSE APPLICATION WINDOW OPEN

The city is now accepting applications for dispensary licenses. The application period
runs from February 1 to March 1, 2025. A total of 3 licenses are available for the
north district. Merit-based selection criteria include business experience, financial
capacity, and community benefit plans.

Application forms available at city hall or online at city.gov/cannabis"#,
    ),
    (
        "zoning_amendment_approved.txt",
        r#"PLANNING AND ZONING COMMISSION
Date: December 5, 2024

ZONING AMENDMENT: CANNABIS CULTIVATION FACILITIES

The commission approved zoning amendments to allow cannabis cultivation facilities in
agricultural zones. The amendment passed with a 4-1 vote. Conditional use permits will
be required for all cultivation operations. The amendment is effective January 1, 2025.

Public hearing was well-attended with strong community support for local cannabis
cultivation opportunities."#,
    ),
    (
        "cannabis_tax_ordinance.txt",
        r#"CITY COUNCIL MEETING
Date: November 12, 2024

ORDINANCE: CANNABIS BUSINESS TAX

The council approved a new cannabis business tax ordinance. The ordinance establishes
a 5% tax on gross receipts for all cannabis retail operations and a 3% tax on cultivation
facilities. The tax revenue will be dedicated to public safety and community programs.

Budget discussion included projections for $1.8 million in annual cannabis tax revenue.
Ordinance passed 6-1, effective January 1, 2025."#,
    ),
    (
        "social_equity_program.txt",
        r#"DEPARTMENT OF ECONOMIC DEVELOPMENT
Date: January 20, 2025

SOCIAL EQUITY CANNABIS BUSINESS PROGRAM

The city has launched a social equity program for cannabis business licensing. The
program provides technical assistance, reduced fees, and priority consideration for
applicants from communities disproportionately impacted by cannabis prohibition.

Application period opens March 1, 2025. Study session scheduled for February 15."#,
    ),
    (
        "cannabis_retail_denied.txt",
        r#"PLANNING COMMISSION DECISION
Date: December 20, 2024

CONDITIONAL USE PERMIT DENIED: CANNABIS RETAIL

The commission denied a conditional use permit for a proposed cannabis retail location
at 123 Main Street. The denial was based on proximity to schools and insufficient
parking. The applicant may appeal the decision within 30 days.

Public hearing was held on December 15 with significant community opposition."#,
    ),
    (
        "cannabis_ordinance_study.txt",
        r#"CITY MANAGER'S OFFICE
Date: October 5, 2024

STUDY SESSION: CANNABIS ORDINANCE DEVELOPMENT

The city manager convened a study session to discuss cannabis ordinance development.
Staff presented research on cannabis business regulations from other cities and
recommendations for local implementation. No formal action was taken.

General mention of cannabis business opportunities and regulatory framework."#,
    ),
    (
        "park_maintenance.txt",
        r#"PARKS AND RECREATION DEPARTMENT
Date: January 15, 2025

PARK MAINTENANCE SCHEDULE

The department has scheduled routine maintenance for all city parks. Work will include
landscaping, playground equipment inspection, and facility repairs. No cannabis-related
activities or discussions included in this maintenance schedule.

Maintenance to be completed by March 1, 2025."#,
    ),
    (
        "traffic_signal_repair.txt",
        r#"PUBLIC WORKS DEPARTMENT
Date: February 10, 2025

TRAFFIC SIGNAL REPAIR NOTICE

The traffic signal at the intersection of Oak Street and Pine Avenue will be repaired
on February 15, 2025. Temporary traffic control measures will be in place. This is
routine maintenance with no connection to cannabis business operations.

Repair expected to take 4 hours."#,
    ),
    (
        "library_hours.txt",
        r#"PUBLIC LIBRARY ANNOUNCEMENT
Date: January 25, 2025

LIBRARY HOURS UPDATE

The public library will extend its hours beginning February 1, 2025. New hours:
Monday-Friday 9 AM - 8 PM, Saturday 10 AM - 6 PM, Sunday 1 PM - 5 PM. This change
is unrelated to any cannabis business activities or regulations.

Extended hours made possible by increased city budget allocation."#,
    ),
    (
        "water_main_repair.txt",
        r#"UTILITIES DEPARTMENT
Date: February 5, 2025

WATER MAIN REPAIR SCHEDULE

Emergency water main repair scheduled for February 8, 2025, on Elm Street between
2nd and 3rd Avenues. No cannabis business operations or regulatory activities
involved. Standard utility maintenance procedure.

Repair expected to take 6 hours with temporary water service interruption."#,
    ),
    (
        "garbage_collection.txt",
        r#"SANITATION DEPARTMENT
Date: January 30, 2025

GARBAGE COLLECTION SCHEDULE UPDATE

Due to the upcoming holiday, garbage collection will be delayed by one day for all
routes. This affects all city residents and businesses, including any cannabis
businesses operating in the city. No special cannabis-related considerations.

Updated schedule effective February 1, 2025."#,
    ),
];

pub fn sample_documents() -> impl Iterator<Item = (&'static str, &'static str)> {
    SAMPLE_DOCUMENTS.iter().copied()
}

/// Writes every sample into `dir` (created if needed) and returns the paths.
pub fn write_sample_documents(dir: impl AsRef<Path>) -> io::Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(SAMPLE_DOCUMENTS.len());
    for (name, text) in sample_documents() {
        let path = dir.join(name);
        fs::write(&path, text)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sample_names_are_unique_text_files() {
        let names: HashSet<&str> = sample_documents().map(|(name, _)| name).collect();
        assert_eq!(names.len(), SAMPLE_DOCUMENTS.len());
        assert!(names.iter().all(|name| name.ends_with(".txt")));
    }

    #[test]
    fn writes_samples_to_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let written = write_sample_documents(dir.path().join("sample_documents")).expect("write samples");

        assert_eq!(written.len(), SAMPLE_DOCUMENTS.len());
        let first = fs::read_to_string(&written[0]).expect("read sample");
        assert!(first.starts_with("CITY COUNCIL MEETING MINUTES"));
    }
}
