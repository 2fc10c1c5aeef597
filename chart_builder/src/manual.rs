/*!

This is the long-form manual for `chart_builder` and `chartbuild`.

## Input data

The data is a grid: the first row holds the column names, the following rows
hold the values. It can be read from:
* `text` pasted text, with cells separated by tabs (as copied from a
  spreadsheet) or by pipes `|`. If the text contains a single tab anywhere, it
  is split on tabs only.
* `csv` a CSV file with a header row.
* `xlsx` an Excel worksheet (the first one unless a name is given).

Column names are matched without regard to case or surrounding spaces. In the
settings, the values `[None]`, `[Required]` and `Please select` mean that no
column is selected.

## Validation

Nothing is built before the data passes the following stages. The first stage
that finds a problem stops the validation and its errors are reported:

1. structure: a column named like `ethnicity`, a column named like `value`,
   and all the rows as long as the header row.
2. settings: the category column must be mapped (it defaults to the first
   column named like `ethnicity`) and present. Every other mapped column
   must be present too; the first one missing is reported.
3. data: each category must appear once. With a secondary column, each
   (category, secondary value) pair must appear exactly once.

The error types are `SettingsError`, `EthnicityError`, `ValueError`,
`RectangleError`, `MissingDataError`, `DuplicationError` and
`ComplexDataError`. The last one is reported when every category appears the
same number of times: the data most likely has a second dimension that was
not mapped.

## Charts

| type               | x-axis            | series                     |
|--------------------|-------------------|----------------------------|
| `bar_chart`        | category column   | one, or one per secondary value |
| `line_graph`       | category column   | one per secondary value    |
| `component_chart`  | category column   | one per secondary value, reversed |
| `panel_bar_chart`  | category column   | one bar chart per secondary value |
| `panel_line_chart` | category column   | one line per panel         |

Categories keep the order of their first appearance, unless an order column
is mapped: the rows are then sorted by the text of that column. Line chart
series are sorted alphabetically unless a series order column is given.

Values that are not numbers are plotted as 0 and keep their text. The
renderer shows a marker for them:

| text         | marker           |
|--------------|------------------|
| `N/A`, `-`   | `not_applicable` |
| `!`          | `withheld`       |
| `?`          | `missing`        |
| `*`          | `unreliable`     |
| `~`          | `rounds_to_zero` |
| other        | `unknown`        |

When all the series names of a bar chart are numbers (possibly after a
currency sign), the series are sorted by that number.

## Parents and children

When a parent column is mapped, every category is either a parent (its parent
is itself) or a child. Parents referenced by children but absent from the data
are added, with no value. Each parent is then followed by its children.

## Tables

A table has one row per category with the values of the data columns. When a
group column is mapped, the table holds one block of rows per group, and the
`data` rows put the values of all the groups side by side.

Every data column is displayed with the number of decimal places of its most
precise value, with thousands separators. Columns whose values all look like
years (whole numbers between 1950 and 2050) are displayed as they are. A
blank cell is not a year. Halves are rounded away from zero.

## Number formats

* `none` no prefix or suffix.
* `percent` a `%` suffix, the axis going from 0 to 100.
* `other` the prefix, suffix, min and max given in the settings.

A multiplier other than 1 scales every chart value, which is then rounded to 2
decimal places.

## Presets

A preset (classification) maps the raw values of the category column to a
display name, a parent and an order. Merging a preset replaces the category
column by the `Ethnicity`, `Ethnicity-parent` and `Ethnicity-order` columns.
Rows with no mapping in the preset are dropped.

*/
