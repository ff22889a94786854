/*!

This is the long-form manual for `merit_engine` and `meritlist`.

## Input table

The candidates are read from the first worksheet of an Excel file (`.xlsx`) or
from a CSV file with a header row. The following columns are required:

* `FORM NUMBER`
* `NAME OF THE APPLICANT`
* `CATEGORY`
* `EMAIL`
* `MOBILE`
* `ObtainMarks` the score. Rows where it is not a number are not ranked.
* `Final_Attendance` only the rows marked `Present` (in any case, with any
  surrounding spaces) are ranked.

The column `PwD (PERCENTAGE OF DISABILITY)` is optional. Candidates with a
percentage above zero appear in the PwD list.

Other columns are ignored.

## Categories

Category labels are trimmed and upper-cased. The spellings of OBC-NCL (`OBC - NCL`,
`obc-ncl`, `OBC –NCL`, ...) are merged into `OBC-NCL`, and the verbose names
`SCHEDULED CASTE (SC)` and `SCHEDULED TRIBE (ST)` (with their usual typos) are
replaced by `SC` and `ST`. Any other label is kept as its own category.

`GENERAL` is matched exactly after this normalization. It does not get a category
list: the general list ranks every eligible candidate against the `GENERAL` seats.

## Configuration

The tool reads a JSON file:

```json
{
  "outputSettings": {
    "programName": "M.Tech. Cyber Security",
    "outputDirectory": "output"
  },
  "candidateFileSources": [
    { "provider": "xlsx", "filePath": "merged_mtech_cyber_security.xlsx" }
  ],
  "seatMatrix": [
    {
      "school": "School of Cyber Security and Digital Forensics",
      "program": "M.Tech. Cyber Security",
      "campus": "Goa",
      "approvedIntake": 23,
      "seats": { "GENERAL": 10, "OBC-NCL": 6, "SC": 3, "ST": 2, "EWS": 2, "PwD": 1 }
    }
  ],
  "selectedProgram": "M.Tech. Cyber Security (Goa)",
  "rules": { "callMultiplier": 3 }
}
```

* `provider` is `xlsx` or `csv`. Several sources are concatenated. `excelWorksheetName`
  selects a worksheet other than the first one.
* `selectedProgram` is `<program> (<campus>)`. It may be omitted when the seat
  matrix has a single row.
* The categories of `seats` are normalized like the candidates' categories. A
  category missing from `seats` has no seats. Negative seat counts are rejected.
* `callMultiplier` is the number of candidates called per seat. It has no default
  and may also be given on the command line.

## Outputs

One CSV file is written per list:

* `<PROGRAM>_general_merit_list.csv`
* `<PROGRAM>_<CATEGORY>_merit_list.csv` for each category other than GENERAL
* `<PROGRAM>_pwd_merit_list.csv`

with the columns `Merit No.`, `FORM NUMBER`, `NAME OF THE APPLICANT`, `CATEGORY`,
`EMAIL`, `MOBILE`, `ObtainMarks`, `Counselling Status`.

Ranks follow competition ranking: tied scores share the best rank of the group.
The first `seats * callMultiplier` rows of a list are `Called for Counselling`,
the others are `Waitlisted`. The boundary is positional, so two candidates with
the same rank may end up on both sides of it. The PwD list is informational and
its status is always `--`.

*/
