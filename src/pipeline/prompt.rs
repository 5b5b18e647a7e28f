use super::orchestrator::RooftopSubmission;

pub const SYSTEM_INSTRUCTION: &str = "You are an expert in solar rooftop design and installation.";

pub fn build_prompt(submission: &RooftopSubmission) -> String {
    format!(
        "Analyze the following rooftop details for solar installation feasibility and provide recommendations:\n\n\
        Usable Area: {:?} sqm\n\
        Orientation: {}\n\
        Obstructions: {}\n\
        Shading: {}\n\n\
        Provide a summary report including expected solar panel capacity, estimated cost, \
        potential annual energy generation, savings, and payback period.",
        submission.area_sqm,
        submission.orientation.trim(),
        submission.obstructions.trim(),
        submission.shading.trim(),
    )
}
