/*!

This is the long-form manual for `survey_analysis` and `survey-analyzer`.

## Inputs

An analysis needs three collections, as exported from the survey platform
(LimeSurvey or any tool with the same conventions):

* the questions, including the sub-questions
* the answer options
* the responses

### Questions

One row per question or sub-question. The values are read as text, and the
first non-empty field of each line below is used:

| field              | names                          | notes                          |
|--------------------|--------------------------------|--------------------------------|
| id                 | `id`, `qid`                    | required, unique               |
| type               | `question_theme_name`, `type`  | required                       |
| code               | `code`, `title`                | name of the response columns   |
| text               | `question`, `text`             |                                |
| group              | `group_id`, `gid`              |                                |
| mandatory          | `mandatory`                    | `Y`, `yes`, `true` or `1`      |
| parent             | `parent_qid`                   | `0` or empty for a question    |
| order              | `question_order`               |                                |
| "other" choice     | `other`                        | same values as `mandatory`     |
| maximum ranks      | `max_answers`                  | empty or `0` means no limit    |

The type is either a LimeSurvey type letter (`L`, `M`, `R`, `T`, `*`, `Q`,
`F`, ...), a question theme name (`listradio`, `multiplechoice`, `ranking`,
...) or one of the names `singleChoice`, `multipleChoice`, `ranking`,
`freeText`, `equation`, `multipleShortText`, `array`. When the theme name
is not known (a custom theme such as `bootstrap_buttons`), the type letter
is used instead. The other types (for example `boilerplate`) are loaded but
not aggregated.

### Answer options

One row per option:

| field       | names                           | notes     |
|-------------|---------------------------------|-----------|
| question id | `question_id`, `qid`            | required  |
| value       | `value`, `code`, `option_code`  | required  |
| label       | `label`, `answer`               | required  |
| order       | `order`, `sortorder`            |           |

The command line also accepts the shape returned per question by the remote
API of LimeSurvey:

```text
{"12": {"A1": {"answer": "Yes", "order": 1}, "A2": {"answer": "No", "order": 2}},
 "13": "No available answer options"}
```

Some types have answers that are never exported as options. They are known
to the engine:

| types                          | answers                          |
|--------------------------------|----------------------------------|
| `Y` (yes/no)                   | `Y` Yes, `N` No                  |
| `G` (gender)                   | `M` Male, `F` Female             |
| `5`, `A` (5 point)             | `1` to `5`: Point 1 to Point 5   |
| `B` (10 point)                 | `1` to `10`: Point 1 to Point 10 |
| `C`                            | `Y` Yes, `N` No, `U` Uncertain   |
| `E`                            | `I` Increase, `S` Same, `D` Decrease |

The answer `-oth-` is the "other" choice and is reported as `Other`.

### Responses

One record per respondent, mapping column names to values. Empty values
are missing answers. The columns `id`, `submitdate`, `lastpage`,
`startlanguage`, `seed`, `startdate`, `datestamp` and `refurl` are
bookkeeping and never belong to a question. A response without a
`submitdate` was not submitted: the command line drops these responses
unless `--keep-incomplete` is given.

The columns of a question are named after its code `Q1`:

* `Q1` holds the answer of single choice, equation and free text questions
* `Q1[SQ001]` or `Q1_SQ001` holds the part `SQ001`: an option of a multiple
  choice, a rank of a ranking, a sub-question of an array or of a multiple
  short text
* `Q1[other]`, `Q1_other` or `Q1other` holds the text typed in the "other"
  field
* for multiple choice questions, `Q1[SQ001comment]` and `Q1[othercomment]`
  hold the comments typed next to an option. They are not counted.

Codes are always compared whole: the columns of `Q10` never go to `Q1`.

## Results

* single choice and equation: the number of respondents per answer
* multiple choice: the number of respondents per option (with the options
  nobody ticked), and the number of respondents who ticked anything. Under
  the default `strict` rule an option column must hold `Y`, `N` or nothing.
  Any other value fails the question. The `nonEmpty` rule accepts any value
  other than `N`.
* ranking: for each answer, the number of respondents per rank. With
  `respectMaxAnswers`, the ranks after `max_answers` are ignored.
* free text: the answers in the order of the responses
* multiple short text: the answers of each sub-question
* array: the number of respondents per answer, for each sub-question

A question that fails is reported and does not stop the analysis.

## Configuration

The command line reads a JSON configuration file:

```text
{
  "outputSettings": {"surveyName": "Feedback", "surveyId": "123456", "outputPath": "summary.json"},
  "sources": {
    "questionsPath": "questions.json",
    "optionsPath": "options.json",
    "responsesPath": "responses.csv",
    "responsesProvider": "csv"
  },
  "rules": {"selectionRule": "strict", "keepIncompleteResponses": false},
  "cacheDirectory": ".question_cache"
}
```

The paths are relative to the configuration file. `responsesProvider` is
`json`, `csv` or `xlsx` (with `excelWorksheetName` to pick a worksheet other
than the first one). The rules also accept `parallel` and
`respectMaxAnswers`. Command line arguments override the configuration.

 */
