//! Prompt shaping for the content generator.
//!
//! Each difficulty tier selects its own guidance for learning plans, lessons
//! and quizzes. The quiz prompt asks for exactly the block format that
//! [`crate::parser`] understands.

use crate::model::DifficultyTier;

/// Guidance appended to a learning-plan prompt.
pub fn plan_guidance(tier: DifficultyTier) -> &'static str {
    match tier {
        DifficultyTier::Beginner => {
            "Focus on fundamentals and basic concepts. Use simple language and provide plenty of examples."
        }
        DifficultyTier::Intermediate => {
            "Build on foundational knowledge. Include more technical details and practical applications."
        }
        DifficultyTier::Advanced => {
            "Assume strong foundational knowledge. Focus on advanced concepts, edge cases, and expert-level insights."
        }
    }
}

/// Guidance appended to a lesson prompt.
pub fn lesson_guidance(tier: DifficultyTier) -> &'static str {
    match tier {
        DifficultyTier::Beginner => {
            "Use simple language, provide step-by-step explanations, and include basic examples."
        }
        DifficultyTier::Intermediate => {
            "Include technical details, practical applications, and real-world scenarios."
        }
        DifficultyTier::Advanced => {
            "Focus on complex concepts, advanced techniques, and expert-level insights."
        }
    }
}

/// Guidance appended to a quiz prompt.
pub fn quiz_guidance(tier: DifficultyTier) -> &'static str {
    match tier {
        DifficultyTier::Beginner => {
            "Focus on basic concepts and definitions. Questions should test fundamental understanding."
        }
        DifficultyTier::Intermediate => {
            "Include application-based questions. Test understanding of how concepts work together."
        }
        DifficultyTier::Advanced => {
            "Focus on complex scenarios, edge cases, and expert-level knowledge. Include analytical questions."
        }
    }
}

pub fn learning_plan_prompt(topic: &str, goal: &str, tier: DifficultyTier) -> String {
    format!(
        "Create a detailed learning plan for: {topic}

Learning Goal: {goal}
Difficulty Level: {tier}

{guidance}

Structure the plan as:
1. Learning Objectives (3-5 specific, measurable goals)
2. Prerequisites (if any - what should learners know before starting)
3. Learning Path (5-7 modules with brief descriptions)
   - Each module should build on the previous one
   - Include estimated time for each module
4. Estimated Total Time
5. Resources & Next Steps

Make it practical, engaging, and tailored to the {tier} level.",
        guidance = plan_guidance(tier),
    )
}

pub fn lesson_prompt(topic: &str, module_name: &str, tier: DifficultyTier) -> String {
    format!(
        "Create a comprehensive lesson on: {module_name} (part of {topic})

Difficulty: {tier}

{guidance}

Include:
1. Introduction & Context (why this module matters)
2. Core Concepts (with clear explanations)
   - Break down complex ideas into digestible parts
   - Use analogies where helpful
3. Examples (2-3 practical examples)
   - Show real-world applications
   - Include step-by-step walkthroughs
4. Key Takeaways (3-5 main points to remember)
5. Practice Suggestions (how to apply this knowledge)

Make it engaging, educational, and appropriate for {tier} level learners.",
        guidance = lesson_guidance(tier),
    )
}

/// Quiz request in the `Qn:` / `A)` / `Correct:` / `Explanation:` / `---`
/// block format.
pub fn quiz_prompt(topic: &str, tier: DifficultyTier, num_questions: u32) -> String {
    format!(
        "Create a {tier} level quiz about {topic} with {num_questions} multiple choice questions.

{guidance}

Format each question EXACTLY as follows:

Q1: [Question text]
A) [Option A]
B) [Option B]
C) [Option C]
D) [Option D]
Correct: [A/B/C/D]
Explanation: [Why this answer is correct and why others are wrong]

---

Q2: [Question text]
...

Make questions progressively challenging within the {tier} level.
Ensure all options are plausible to test true understanding.
Provide clear, educational explanations.",
        guidance = quiz_guidance(tier),
    )
}

/// Ask the generator to restructure an encyclopedia extract for learners.
pub fn research_summary_prompt(topic: &str, raw_info: &str) -> String {
    format!(
        "Summarise this information about {topic} in a clear, educational format:

{raw_info}

Provide:
1. Brief overview (2-3 sentences)
2. Key concepts (3-5 bullet points)
3. Why it's important

Make it engaging and suitable for learners."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn distinct(f: fn(DifficultyTier) -> &'static str) -> usize {
        DifficultyTier::ALL
            .iter()
            .map(|&t| f(t))
            .collect::<HashSet<_>>()
            .len()
    }

    #[test]
    fn every_tier_has_its_own_guidance() {
        assert_eq!(distinct(plan_guidance), 3);
        assert_eq!(distinct(lesson_guidance), 3);
        assert_eq!(distinct(quiz_guidance), 3);
    }

    #[test]
    fn plan_prompt_carries_topic_goal_and_tier() {
        let prompt = learning_plan_prompt("Rust", "Write a CLI", DifficultyTier::Intermediate);
        assert!(prompt.contains("Create a detailed learning plan for: Rust"));
        assert!(prompt.contains("Learning Goal: Write a CLI"));
        assert!(prompt.contains("Difficulty Level: intermediate"));
        assert!(prompt.contains(plan_guidance(DifficultyTier::Intermediate)));
    }

    #[test]
    fn lesson_prompt_names_module_and_topic() {
        let prompt = lesson_prompt("Rust", "Ownership", DifficultyTier::Advanced);
        assert!(prompt.starts_with("Create a comprehensive lesson on: Ownership (part of Rust)"));
        assert!(prompt.contains(lesson_guidance(DifficultyTier::Advanced)));
        assert!(prompt.contains("Key Takeaways"));
    }

    #[test]
    fn quiz_prompt_requests_parser_format() {
        let prompt = quiz_prompt("Rust", DifficultyTier::Beginner, 7);
        assert!(prompt.contains("with 7 multiple choice questions"));
        assert!(prompt.contains("Q1: [Question text]"));
        assert!(prompt.contains("\nA) [Option A]\n"));
        assert!(prompt.contains("\nCorrect: [A/B/C/D]\n"));
        assert!(prompt.contains("\n---\n"));
    }

    #[test]
    fn research_prompt_embeds_extract() {
        let prompt = research_summary_prompt("Photosynthesis", "Plants make sugar.");
        assert!(prompt.contains("about Photosynthesis"));
        assert!(prompt.contains("\n\nPlants make sugar.\n\n"));
    }
}
