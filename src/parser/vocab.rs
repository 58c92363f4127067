/// The reference vocabulary the skills extractor matches against. Closed
/// world: a skill absent from this table is never detected, whatever the
/// resume says. Entries are the canonical spellings returned to callers.
pub const SKILL_VOCABULARY: &[&str] = &[
    // Languages
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "Kotlin",
    "Swift",
    "Objective-C",
    "C++",
    "C#",
    "Go",
    "Rust",
    "Ruby",
    "PHP",
    "Scala",
    "Perl",
    "Haskell",
    "Elixir",
    "Clojure",
    "Dart",
    "Lua",
    "MATLAB",
    "SQL",
    "HTML",
    "CSS",
    "Bash",
    "PowerShell",
    // Frontend
    "React",
    "Angular",
    "Vue.js",
    "Svelte",
    "Next.js",
    "Nuxt.js",
    "Redux",
    "jQuery",
    "Bootstrap",
    "Tailwind CSS",
    "Sass",
    "Webpack",
    "Vite",
    "Babel",
    "ESLint",
    "Responsive Design",
    // Backend
    "Node.js",
    "Express",
    "Django",
    "Flask",
    "FastAPI",
    "Spring Boot",
    "Ruby on Rails",
    "Laravel",
    "ASP.NET",
    "GraphQL",
    "REST APIs",
    "gRPC",
    "WebSockets",
    "Microservices",
    // Mobile
    "React Native",
    "Flutter",
    "Android",
    "iOS",
    "Xamarin",
    "Ionic",
    // Databases
    "PostgreSQL",
    "MySQL",
    "SQLite",
    "MongoDB",
    "Redis",
    "Cassandra",
    "DynamoDB",
    "Elasticsearch",
    "Oracle",
    "SQL Server",
    "MariaDB",
    "Firebase",
    // Cloud and infrastructure
    "AWS",
    "Azure",
    "Google Cloud",
    "Docker",
    "Kubernetes",
    "Terraform",
    "Ansible",
    "Jenkins",
    "CircleCI",
    "GitHub Actions",
    "CI/CD",
    "Linux",
    "Nginx",
    "Serverless",
    "Helm",
    "Prometheus",
    "Grafana",
    "Datadog",
    // Data and machine learning
    "Machine Learning",
    "Deep Learning",
    "TensorFlow",
    "PyTorch",
    "Keras",
    "Scikit-learn",
    "Pandas",
    "NumPy",
    "Data Analysis",
    "Data Science",
    "Computer Vision",
    "Natural Language Processing",
    "Apache Spark",
    "Hadoop",
    "Kafka",
    "Airflow",
    "Tableau",
    "Power BI",
    // Tools and practices
    "Git",
    "GitHub",
    "GitLab",
    "Bitbucket",
    "Jira",
    "Confluence",
    "Agile",
    "Scrum",
    "Kanban",
    "TDD",
    "Unit Testing",
    "Selenium",
    "Cypress",
    "Jest",
    "Mocha",
    "JUnit",
    "Postman",
    "Figma",
    "Photoshop",
    "Illustrator",
    "UI/UX Design",
    "WordPress",
    "Salesforce",
    "Excel",
    // Soft skills
    "Leadership",
    "Communication",
    "Teamwork",
    "Problem Solving",
    "Critical Thinking",
    "Time Management",
    "Project Management",
    "Public Speaking",
    "Mentoring",
    "Collaboration",
    "Adaptability",
    "Creativity",
    "Attention to Detail",
    "Conflict Resolution",
    "Negotiation",
    "Customer Service",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn no_duplicate_entries() {
        let unique: HashSet<&str> = SKILL_VOCABULARY.iter().copied().collect();
        assert_eq!(unique.len(), SKILL_VOCABULARY.len());
    }

    #[test]
    fn entries_are_trimmed_and_nonempty() {
        for entry in SKILL_VOCABULARY {
            assert!(!entry.is_empty());
            assert_eq!(*entry, entry.trim());
        }
    }
}
