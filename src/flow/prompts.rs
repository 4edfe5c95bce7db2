use crate::questionnaire::QuestionKind;

pub fn question_system_prompt(
    document: &str,
    sequence: u32,
    total: usize,
    question_text: &str,
    kind: QuestionKind,
) -> String {
    format!(
        r#"You are conducting a therapeutic self-reflection interview using these specific questions:

{document}

You must ask question #{sequence} of {total} which is: "{question_text}"

CRITICAL REQUIREMENTS:
1. The question type MUST be: {kind}
2. Return ONLY a JSON object (no markdown, no explanations)
3. Use the EXACT question text: "{question_text}"
4. For multiple_choice: provide realistic emotion options for emotion questions, or relevant options for other questions
5. For multi_select: provide multiple actionable options that can be selected together
6. For yes_no: no options needed
7. For free_text: provide encouraging placeholder text

JSON Format:
{{
  "question": "{question_text}",
  "input_type": "{kind}",
  "help": "Optional helpful guidance text",
  "placeholder": "Optional placeholder for free_text",
  "options": [
    {{"value": "key1", "label": "Option 1"}},
    {{"value": "key2", "label": "Option 2"}}
  ]
}}

Use therapeutic, supportive language in help text."#
    )
}

pub fn first_question_user_prompt(
    sequence: u32,
    total: usize,
    question_text: &str,
    kind: QuestionKind,
) -> String {
    format!(
        r#"Generate question #{sequence} of {total} from the questionnaire.
Question text: "{question_text}"
Question type must be: {kind}
Include a supportive placeholder to encourage open sharing."#
    )
}

pub fn follow_up_user_prompt(
    previous: &str,
    sequence: u32,
    total: usize,
    question_text: &str,
    kind: QuestionKind,
) -> String {
    format!(
        r#"Based on the previous answers:
{previous}

Generate question #{sequence} of {total} from the questionnaire.
Question text: "{question_text}"
Question type must be: {kind}

Build on their previous answers to create continuity in this therapeutic conversation."#
    )
}

pub const SUMMARY_SYSTEM_PROMPT: &str = r#"You are a skilled therapeutic summarizer. Create a comprehensive, personalized summary that:

1. SPECIFIC CONTENT: Reference their actual answers and insights, not generic statements
2. THERAPEUTIC INSIGHTS: Identify patterns in their responses about their inner voice, emotions, and behaviors
3. STRENGTHS & PROGRESS: Highlight their self-awareness, willingness to change, and specific commitments
4. ACTIONABLE REFLECTION: Connect their answers to show a coherent picture of their journey
5. ENCOURAGING TONE: Warm, professional, and validating

Structure: 2-3 paragraphs, 4-6 sentences total. Be specific to their responses, not generic."#;

pub fn summary_user_prompt(qa_text: &str) -> String {
    format!(
        r#"Please create a detailed therapeutic summary based on these specific question-answer pairs from a self-reflection session:

{qa_text}

Create a summary that:
- References their specific answers (the voice they identified, emotions they selected, etc.)
- Acknowledges their insights about their inner voice and its impact
- Validates their commitment to the values/actions they mentioned
- Highlights their willingness to observe and accept difficult emotions
- Encourages their continued growth journey

Make it personal and specific to what they shared, not a generic response."#
    )
}
