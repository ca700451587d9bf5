#[cfg(test)]
pub const POST_DATA: &str = "---
title: What I learned after 20 years of software development
date: 2022-04-02
description: A list of things I try to do myself
image: https://example.com/cover.png
tags:
  - career
  - software
---

How to be a great software engineer?

Someone asked me this question today and I didn't have an answer. After thinking for a while, I came up with a list of what I try to do myself.

I will divide this in parts, non-technical and technical

## Non technical

You finished university and learned a lot. You solved many hard problems.
";

#[cfg(test)]
pub const DRAFT_POST_DATA: &str = "---
title: Unfinished thoughts
date: 2024-06-01
tags: [career]
draft: true
---

Not ready yet.
";

#[cfg(test)]
pub const PREVIEW_FIXTURE: &str = "---
title: Preview fixture
date: 2024-01-01
---

import { Chart } from 'components/chart'

<div className=\"wrapper\">

First paragraph of actual prose.

![diagram](diagram.png)

Second paragraph, still prose.

</div>

Third paragraph after the wrapper.

Fourth paragraph that must not make the cut.
";
