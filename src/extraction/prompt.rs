//! Fixed prompts for Prior Authorization classification
//!
//! These two strings are versioned configuration, not logic: the response
//! parser depends on the exact output format they demand (the `NA` discard
//! marker and the `{'Service': ..., 'Details': ...}` record blocks), so the
//! wording must not drift without a matching parser change.

/// System instruction establishing the classifier's persona and objective.
pub const SYSTEM_INSTRUCTION: &str = r#"You are a healthcare insurance policy bot.

Your goal is to analyze insurance policy documents and identify all services that require Prior Authorization.

You must focus solely on identifying specific services (with full descriptions) that require (or may require) Prior Authorization."#;

/// Task prompt with worked positive/negative examples. The window text is
/// appended directly after the trailing "Actual Text:" line.
pub const TASK_PROMPT: &str = r#"Below you will see an excerpt from a health insurance policy document. The excerpt might NOT contain any services requiring Prior Authorization.
It has been identified because it has the key words "Prior Authorization", regardless of context.

Your goal is to identify whether the specific instance contains information regarding Prior Authorization of a specific
service or not.

If the excerpt DOES specify Prior Authorization being required for specific service (keep in mind the phrasing might be "is required" or "maybe required" or "may be required for certain services"), your expected output is:
{'Service': name_of_service_here , 'Details': description_of_service_here}

Example with Prior Authorization required:
Text: "Ambulance services
Covered ambulance services, whether for an emergency or non-emergency situation, include fixed wing, rotary wing, and ground
ambulance services, to the nearest appropriate facility that can
provide care only if they are furnished to a member whose
medical condition is such that other means of transportation could
endanger the person’s health or if authorized by the plan. If the
covered ambulance services are not for an emergency situation, it
should be documented that the member’s condition is such that
other means of transportation could endanger the person’s health
and that transportation by ambulance is medically required.
$200 copay per one-way
trip (includes ground and
air transport) for each
Medicare-covered
ambulance service.
*Prior Authorization
required for non-emergency needs."
Your Expected Response: "{'Service': "Ambulance Services",
'Details': "Covered ambulance services, whether for an emergency or non-emergency situation, include fixed wing, rotary wing, and ground
ambulance services, to the nearest appropriate facility that can
provide care only if they are furnished to a member whose
medical condition is such that other means of transportation could
endanger the person’s health or if authorized by the plan. If the
covered ambulance services are not for an emergency situation, it
should be documented that the member’s condition is such that
other means of transportation could endanger the person’s health
and that transportation by ambulance is medically required.
$200 copay per one-way
trip (includes ground and
air transport) for each
Medicare-covered
ambulance service. *Prior Authorization
required for non-emergency needs."}

In the example above, notice how there is a specific service named, described and then followed by standard text that says this service DOES require Prior Authorization (sometimes with stipulations like "for non-emergency needs").
As given in the example above, you MUST include the specific Prior Authorization stipulations in your response (such as "Prior Authorization is required", "Prior Authorization may be required", "Prior Authorization required for non-emergency needs" etc)

If the excerpt mentions Prior Authorization not in relation to a specific service but in general discussion, your expected output is:
NA

Example with Prior Authorization mentioned without specific services:
Text: "We will arrange for any medically necessary covered benefit outside of our provider
network, but at in-network cost sharing, when an in-network provider or benefit is
unavailable or inadequate to meet your medical needs. Your PCP or specialist is
responsible for obtaining Prior Authorization, but you should confirm with your PCP or
specialist that authorization was requested"
Your Response: "NA"

Notice in the above example that even though "Prior Authorization" is mentioned, but it's not in reference to any specific service. It's just a general discussion.

Actual Text:
"#;

/// Builds the full task prompt for one window by appending the concatenated
/// three-page text to [`TASK_PROMPT`].
pub fn build_task_prompt(window_text: &str) -> String {
    let mut prompt = String::with_capacity(TASK_PROMPT.len() + window_text.len());
    prompt.push_str(TASK_PROMPT);
    prompt.push_str(window_text);
    prompt
}
