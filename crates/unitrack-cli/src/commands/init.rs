//! The `unitrack init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("unitrack.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("curricula")?;
    write_if_missing(Path::new("curricula/example.toml"), EXAMPLE_CURRICULUM)?;

    write_if_missing(Path::new("transcript.toml"), EXAMPLE_TRANSCRIPT)?;

    println!("\nNext steps:");
    println!("  1. Replace transcript.toml with your own course history");
    println!("  2. Run: unitrack validate --transcript transcript.toml");
    println!("  3. Run: unitrack report");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# unitrack configuration

transcript = "transcript.toml"
curriculum = "curricula/example.toml"

# Complementary hours approved outside the transcript
external_hours = 0

# table or json
format = "table"
"#;

const EXAMPLE_CURRICULUM: &str = r#"id = "cs-2019"
name = "Computer Science (2019)"
total_required_hours = 3200
hours_per_credit = 15
courses_per_semester = 6

[category_requirements]
mandatory = 2280
optional = 360
elective = 120
extension = 120
free_elective = 120
complementary_activity = 200

[overflow_policy]
redistributable = ["optional", "elective", "extension"]
mandatory_ceiling = 2400
"#;

const EXAMPLE_TRANSCRIPT: &str = r#"[student]
name = "Ana Souza"
program = "cs-2019"

[[courses]]
period = "2021.1"
code = "MAT0101"
title = "Calculus I"
category = "mandatory"
credit_hours = 60
grade = 6.5

[[courses]]
period = "2021.1"
code = "CSC0101"
title = "Introduction to Programming"
category = "mandatory"
credit_hours = 60
grade = 7.5

[[courses]]
period = "2021.1"
code = "LET0001"
title = "Academic Writing"
category = "free_elective"
credit_hours = 30
waived = true

[[courses]]
period = "2021.2"
code = "MAT0101"
title = "Calculus I"
category = "mandatory"
credit_hours = 60
grade = 7.0

[[courses]]
period = "2021.2"
code = "CSC0102"
title = "Data Structures"
category = "mandatory"
credit_hours = 60
grade = 8.0

[[courses]]
period = "2021.2"
code = "PHY0101"
title = "Physics I"
category = "mandatory"
credit_hours = 60
withdrawn = true

[[courses]]
period = "2022.1"
code = "CSC0201"
title = "Algorithms"
category = "mandatory"
credit_hours = 60
grade = 8.5

[[courses]]
period = "2022.1"
code = "CSC0310"
title = "Computer Graphics"
category = "optional"
credit_hours = 60
grade = 9.0

[[courses]]
period = "2022.1"
code = "AC001"
title = "Hackathon"
category = "complementary_activity"
credit_hours = 20

[[courses]]
period = "2022.2"
code = "CSC0202"
title = "Operating Systems"
category = "mandatory"
credit_hours = 60
in_progress = true

[[courses]]
period = "2022.2"
code = "EXT0001"
title = "Community Coding Club"
category = "extension"
credit_hours = 45
in_progress = true
"#;
